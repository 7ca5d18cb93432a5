//! The `ImageCompressor` class driving one compression session.
//!
//! # Example
//!
//! ```typescript
//! import init, { ImageCompressor, JsDebouncer } from '@imgpress/wasm';
//!
//! await init();
//! const compressor = new ImageCompressor({ max_width: 2048, max_height: 2048 });
//!
//! async function handleFile(file: File) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   try {
//!     compressor.load_file(file.name, file.type, bytes);
//!   } catch (e) {
//!     alert(e); // not an image, or undecodable
//!     return;
//!   }
//!   originalPreview.src = compressor.original_url ?? '';
//!   compressor.compress(Number(slider.value));
//!   preview.src = compressor.result_url ?? '';
//! }
//!
//! downloadButton.onclick = () => compressor.download();
//! ```

use imgpress_core::{Completion, CompressionConfig, CompressionRequest, Quality, Session};
use wasm_bindgen::prelude::*;

use crate::surface::{trigger_download, ObjectUrlSurface};

/// A compression request issued by [`ImageCompressor::begin`].
#[wasm_bindgen]
pub struct CompressionTicket {
    request: CompressionRequest,
}

#[wasm_bindgen]
impl CompressionTicket {
    /// Sequence number; larger means more recent.
    #[wasm_bindgen(getter)]
    pub fn sequence(&self) -> f64 {
        self.request.sequence as f64
    }

    /// Requested quality fraction.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.request.quality.value()
    }
}

/// Session wrapper for JavaScript.
///
/// Holds the loaded image and the displayed result. Both previews are
/// exposed as object URLs; a result URL is revoked as soon as a newer result
/// replaces it, and the original's URL when another file is loaded.
#[wasm_bindgen]
pub struct ImageCompressor {
    session: Session<ObjectUrlSurface>,
    debounce_ms: u32,
}

#[wasm_bindgen]
impl ImageCompressor {
    /// Create a compressor. `config` may be `undefined` or a partial
    /// configuration object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImageCompressor, JsValue> {
        let config: CompressionConfig = if config.is_undefined() || config.is_null() {
            CompressionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let session = Session::new(ObjectUrlSurface, &config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(ImageCompressor {
            session,
            debounce_ms: config.debounce_ms,
        })
    }

    /// Load a selected or dropped file.
    ///
    /// Throws if the declared type is not an image or the bytes cannot be
    /// decoded; the previously loaded image and result are kept in that case.
    pub fn load_file(&mut self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.session
            .select_file(name, mime, bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Compress the loaded image at a slider percentage (1-100) and display
    /// the result.
    pub fn compress(&mut self, quality_percent: u8) -> Result<(), JsValue> {
        self.session
            .compress(Quality::from_percent(quality_percent))
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Issue a request without running it, for hosts that schedule the work
    /// themselves. Pair with [`ImageCompressor::finish`].
    pub fn begin(&mut self, quality_percent: u8) -> Result<CompressionTicket, JsValue> {
        self.session
            .issue(Quality::from_percent(quality_percent))
            .map(|request| CompressionTicket { request })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run a ticket and display its result.
    ///
    /// Returns `false` when a newer ticket was issued (or a new file loaded)
    /// in the meantime; the stale result is discarded.
    pub fn finish(&mut self, ticket: &CompressionTicket) -> Result<bool, JsValue> {
        let outcome = self.session.run(&ticket.request);
        self.session
            .complete(&ticket.request, outcome)
            .map(|completion| completion == Completion::Installed)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Save the current result as `compressed_<original name>`.
    ///
    /// Returns `false` when there is nothing to download yet.
    pub fn download(&self) -> Result<bool, JsValue> {
        let Some(download) = self.session.download() else {
            return Ok(false);
        };
        trigger_download(&download, self.session.handle().map(String::as_str))?;
        Ok(true)
    }

    /// Release the displayed result and its object URL. The original's URL
    /// lives until another file is loaded or the compressor is freed.
    pub fn dispose(&mut self) {
        self.session.clear();
    }

    /// Object URL of the loaded file.
    #[wasm_bindgen(getter)]
    pub fn original_url(&self) -> Option<String> {
        self.session.source_handle().cloned()
    }

    /// Object URL of the current result.
    #[wasm_bindgen(getter)]
    pub fn result_url(&self) -> Option<String> {
        self.session.handle().cloned()
    }

    /// Mime type of the current result.
    #[wasm_bindgen(getter)]
    pub fn result_mime(&self) -> Option<String> {
        self.session.current().map(|result| result.mime.clone())
    }

    /// Byte size of the current result.
    #[wasm_bindgen(getter)]
    pub fn result_size(&self) -> Option<usize> {
        self.session.current().map(|result| result.byte_len())
    }

    #[wasm_bindgen(getter)]
    pub fn result_width(&self) -> Option<u32> {
        self.session.current().map(|result| result.dimensions.width)
    }

    #[wasm_bindgen(getter)]
    pub fn result_height(&self) -> Option<u32> {
        self.session.current().map(|result| result.dimensions.height)
    }

    /// Whether the current result is the original file, kept because
    /// re-encoding made it larger.
    #[wasm_bindgen(getter)]
    pub fn fell_back(&self) -> bool {
        self.session.current().is_some_and(|result| result.fell_back)
    }

    /// Byte size of the loaded file.
    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> Option<usize> {
        self.session.source().map(|source| source.byte_len())
    }

    /// Formatted size of the loaded file, e.g. "1.5 MB".
    #[wasm_bindgen(getter)]
    pub fn original_size_label(&self) -> Option<String> {
        self.session.original_size_label()
    }

    /// Formatted size of the current result.
    #[wasm_bindgen(getter)]
    pub fn result_size_label(&self) -> Option<String> {
        self.session.result_size_label()
    }

    /// Name the download will be saved under.
    #[wasm_bindgen(getter)]
    pub fn download_name(&self) -> Option<String> {
        self.session.download().map(|download| download.file_name)
    }

    /// Debounce window configured for slider changes, in milliseconds.
    #[wasm_bindgen(getter)]
    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests can only run on wasm32 targets. Use `wasm-pack test` to run
/// these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::io::Cursor;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_png(width: u32, height: u32) -> Vec<u8> {
        use image::codecs::png::PngEncoder;
        use image::{ExtendedColorType, ImageEncoder};

        let pixels = vec![180u8; width as usize * height as usize * 3];
        let mut buffer = Cursor::new(Vec::new());
        PngEncoder::new(&mut buffer)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer.into_inner()
    }

    #[wasm_bindgen_test]
    fn test_rejects_non_image() {
        let mut compressor = ImageCompressor::new(JsValue::UNDEFINED).unwrap();
        assert!(compressor
            .load_file("notes.txt", "text/plain", b"hi".to_vec())
            .is_err());
        assert!(compressor.original_size().is_none());
    }

    #[wasm_bindgen_test]
    fn test_compress_png_to_jpeg() {
        let mut compressor = ImageCompressor::new(JsValue::UNDEFINED).unwrap();
        compressor
            .load_file("flat.png", "image/png", test_png(20, 10))
            .unwrap();
        compressor.compress(50).unwrap();

        assert_eq!(compressor.result_mime().as_deref(), Some("image/jpeg"));
        let original = compressor.original_url().unwrap();
        assert!(original.starts_with("blob:"));
        assert_ne!(Some(original), compressor.result_url());
        assert!(compressor.result_url().unwrap().starts_with("blob:"));
        assert_eq!(
            compressor.download_name().as_deref(),
            Some("compressed_flat.png")
        );
    }

    #[wasm_bindgen_test]
    fn test_loading_replaces_original_url() {
        let mut compressor = ImageCompressor::new(JsValue::UNDEFINED).unwrap();
        assert!(compressor.original_url().is_none());

        compressor
            .load_file("a.png", "image/png", test_png(4, 4))
            .unwrap();
        let first = compressor.original_url().unwrap();
        compressor
            .load_file("b.png", "image/png", test_png(4, 4))
            .unwrap();
        assert_ne!(compressor.original_url().unwrap(), first);
    }

    #[wasm_bindgen_test]
    fn test_stale_ticket_is_discarded() {
        let mut compressor = ImageCompressor::new(JsValue::UNDEFINED).unwrap();
        compressor
            .load_file("flat.png", "image/png", test_png(20, 10))
            .unwrap();

        let first = compressor.begin(30).unwrap();
        let second = compressor.begin(60).unwrap();
        assert!(compressor.finish(&second).unwrap());
        assert!(!compressor.finish(&first).unwrap());
    }
}
