//! Entry point for the WASM application

use discharge_review::{App, API_BASE_URL};
use leptos::*;

pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Discharge Review - Starting Leptos App (API: {})", API_BASE_URL);

    mount_to_body(|| view! { <App/> })
}
