//! Schema Canvas - visual database schema editor
//!
//! Tables, columns and foreign keys on a pannable canvas, with undo/redo and
//! orthogonal connector routing. The editing core lives in [`core`] and has no
//! DOM dependency; [`ui`] renders it with Leptos.

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
