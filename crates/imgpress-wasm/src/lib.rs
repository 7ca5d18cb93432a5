//! imgpress WASM - WebAssembly bindings for imgpress
//!
//! This crate exposes the imgpress-core compression session to the browser
//! page that hosts the upload area, quality slider and download button.
//!
//! # Module Structure
//!
//! - `compressor` - The `ImageCompressor` session class
//! - `debounce` - `JsDebouncer`, a `setTimeout`-driven debouncer
//! - `surface` - Object-URL display handles and the download trigger
//! - `logger` - Routes core `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageCompressor, JsDebouncer, is_image_type } from '@imgpress/wasm';
//!
//! await init();
//! const compressor = new ImageCompressor(undefined);
//! const debounced = new JsDebouncer(compressor.debounce_ms, (percent) => {
//!   compressor.compress(percent);
//!   preview.src = compressor.result_url ?? '';
//! });
//! ```

use wasm_bindgen::prelude::*;

mod compressor;
mod debounce;
mod logger;
mod surface;

pub use compressor::{CompressionTicket, ImageCompressor};
pub use debounce::JsDebouncer;
pub use logger::set_log_level;
pub use surface::ObjectUrlSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check whether a declared file type is an image type.
#[wasm_bindgen]
pub fn is_image_type(mime: &str) -> bool {
    imgpress_core::is_image_type(mime)
}

/// Format a byte count for display, e.g. `1536` -> `"1.5 KB"`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    imgpress_core::format_file_size(bytes.max(0.0) as u64)
}

/// Map a slider percentage (1-100) to the quality fraction used for encoding.
#[wasm_bindgen]
pub fn quality_from_percent(percent: u8) -> f32 {
    imgpress_core::Quality::from_percent(percent).value()
}
