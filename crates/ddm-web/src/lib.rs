//! Browser host page for the DDM scene
//!
//! A navigation bar and a load status overlay around the scene plugin.
//! Scene settings can be overridden from the page query string.

mod app;
mod host;
mod ui;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    // wgpu logs a lot at info level
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(tracing::Level::WARN)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);

    app::run();
}
