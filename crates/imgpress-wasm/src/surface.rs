//! Object-URL display handles and the download trigger.
//!
//! Each displayed result is wrapped in a `Blob` and shown through an object
//! URL. URLs are revoked when the session supersedes the result.

use imgpress_core::{DisplaySurface, Download};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url, Window};

/// [`DisplaySurface`] backed by `URL.createObjectURL`.
#[derive(Debug, Default)]
pub struct ObjectUrlSurface;

impl DisplaySurface for ObjectUrlSurface {
    type Handle = String;
    type Error = String;

    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, String> {
        object_url(bytes, mime).map_err(describe)
    }

    fn release(&mut self, handle: String) -> Result<(), String> {
        Url::revoke_object_url(&handle).map_err(describe)
    }
}

/// Create an object URL for `bytes` typed as `mime`.
pub(crate) fn object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

/// Save `download` by clicking a temporary `<a download>` element.
///
/// `display_url` is reused when the result already has one; otherwise a
/// temporary URL is created and revoked once the click has been handled.
pub(crate) fn trigger_download(
    download: &Download<'_>,
    display_url: Option<&str>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(JsValue::from)?;
    anchor.set_download(&download.file_name);

    match display_url {
        Some(url) => {
            anchor.set_href(url);
            anchor.click();
        }
        None => {
            let url = object_url(download.bytes, download.mime)?;
            anchor.set_href(&url);
            anchor.click();
            // Revoking synchronously cancels the download in some browsers
            revoke_later(&window, url)?;
        }
    }
    Ok(())
}

/// Revoke `url` from a zero-delay timer, after the current task finishes.
pub(crate) fn revoke_later(window: &Window, url: String) -> Result<(), JsValue> {
    let revoke = Closure::once_into_js(move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            warn!("failed to revoke download URL: {}", describe(e));
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), 0)?;
    Ok(())
}

fn describe(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
