#![allow(warnings)]
//! Todo UI Frontend Entry Point

mod api;
mod app;
mod components;
mod controller;
mod filters;
mod local;
mod models;
mod remote;
mod storage;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
