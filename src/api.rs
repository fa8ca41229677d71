//! HTTP Client
//!
//! Thin wrapper over `gloo_net` for the todo service, normalizing every
//! outcome into [`ApiError`] and exposing the `TodoApi` seam the mutation
//! controller is written against.

use gloo_net::http::{Request, RequestBuilder};
use leptos::prelude::*;
use serde_json::{json, Value};

/// Fixed base endpoint of the remote todo service.
pub const API_BASE: &str = "http://localhost:3001";

pub type ApiResult<T> = Result<T, ApiError>;

/// Request failures, split by where they happened
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failed entirely; the server never answered.
    Connectivity(String),
    /// The server answered with a failing status code.
    Request { status: u16, message: String },
    /// The server answered 2xx but not with JSON.
    ResponseFormat(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Connectivity(msg) => write!(f, "Connection failed: {}", msg),
            ApiError::Request { status, message } => {
                write!(f, "Request failed ({}): {}", status, message)
            }
            ApiError::ResponseFormat(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// ========================
// Request Plumbing
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

/// Options for a single request
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers, applied after the JSON default so callers can override.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::Put,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            ..Self::default()
        }
    }
}

thread_local! {
    static LAST_ERROR: RwSignal<Option<ApiError>> = RwSignal::new(None);
}

/// Most recent request failure, for display only.
///
/// Every failed [`request`] updates this signal as a convenience for the
/// presentation layer; callers still receive the error directly and must not
/// branch on this.
pub fn last_api_error() -> RwSignal<Option<ApiError>> {
    LAST_ERROR.with(|signal| *signal)
}

/// Issue a request against `API_BASE` and return the parsed JSON body.
pub async fn request(endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
    let result = send(endpoint, options).await;
    if let Err(err) = &result {
        leptos::logging::error!("[API] {} {}", endpoint, err);
        LAST_ERROR.with(|signal| signal.set(Some(err.clone())));
    }
    result
}

async fn send(endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
    let url = format!("{}{}", API_BASE, endpoint);

    let mut builder: RequestBuilder = match options.method {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
        Method::Put => Request::put(&url),
        Method::Delete => Request::delete(&url),
    };

    // Default first, caller headers after, so a caller-supplied
    // Content-Type wins.
    builder = builder.header("Content-Type", "application/json");
    for (name, value) in &options.headers {
        builder = builder.header(name, value);
    }

    let request = match options.body {
        Some(body) => builder.body(body.to_string()),
        None => builder.build(),
    }
    .map_err(|err| ApiError::Request {
        status: 0,
        message: format!("failed to build request: {}", err),
    })?;

    let response = request.send().await.map_err(|err| {
        ApiError::Connectivity(format!("cannot reach the todo service at {}: {}", API_BASE, err))
    })?;

    let status = response.status();
    if !response.ok() {
        let message = match response.text().await {
            Ok(text) if !text.trim().is_empty() => text,
            _ => format!("HTTP error, status={}", status),
        };
        return Err(ApiError::Request { status, message });
    }

    let body = response.text().await.map_err(|err| {
        ApiError::ResponseFormat(format!("failed to read response body: {}", err))
    })?;

    // DELETE replies are status-only; an empty success body is fine.
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !content_type.contains("application/json") {
        return Err(ApiError::ResponseFormat(format!(
            "expected JSON, got `{}`: {}",
            content_type,
            preview(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|err| ApiError::ResponseFormat(format!("invalid JSON in response: {}", err)))
}

/// Truncate a raw body to a short diagnostic preview.
fn preview(body: &str) -> String {
    body.chars().take(100).collect()
}

// ========================
// Todo Service
// ========================

/// Transport seam for the mutation controller.
///
/// The production implementation talks to the REST service; tests substitute
/// an in-memory fake.
pub trait TodoApi {
    async fn fetch_all(&self) -> ApiResult<Value>;
    async fn create(&self, title: &str) -> ApiResult<Value>;
    async fn update(&self, id: u64, title: &str, completed: bool) -> ApiResult<Value>;
    async fn delete(&self, id: u64) -> ApiResult<()>;
}

/// REST client for the todo collection service
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiClient;

impl TodoApi for ApiClient {
    async fn fetch_all(&self) -> ApiResult<Value> {
        request("/todos", RequestOptions::get()).await
    }

    async fn create(&self, title: &str) -> ApiResult<Value> {
        request("/todos", RequestOptions::post(json!({ "title": title }))).await
    }

    async fn update(&self, id: u64, title: &str, completed: bool) -> ApiResult<Value> {
        let endpoint = format!("/todos/{}", id);
        request(
            &endpoint,
            RequestOptions::put(json!({ "title": title, "completed": completed })),
        )
        .await
    }

    async fn delete(&self, id: u64) -> ApiResult<()> {
        let endpoint = format!("/todos/{}", id);
        request(&endpoint, RequestOptions::delete()).await.map(|_| ())
    }
}
