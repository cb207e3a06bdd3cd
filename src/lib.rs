mod app;
mod components;
mod controller;
mod favorites;
mod host;
mod models;
mod overview;
mod pages;
mod popup;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
