//! Checkout Web Frontend
//!
//! Leptos-based WASM page that collects a card through VGS Collect secure
//! fields and forwards the interim card key to the checkout backend.

mod api;
mod app;
mod components;
mod pages;
mod store;
mod vgs;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
