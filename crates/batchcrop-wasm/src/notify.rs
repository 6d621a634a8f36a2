//! Blocking alerts and archive download.

use batchcrop_core::Archive;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, Url};

use crate::handles::{bytes_to_blob, describe};

/// Time the download URL stays valid after the click.
const REVOKE_DELAY_MS: i32 = 40_000;

/// Show a blocking alert. Falls back to the console when there is no window.
pub(crate) fn alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(e) = window.alert_with_message(message) {
                log::warn!("alert failed: {}", describe(&e));
            }
        }
        None => log::error!("{}", message),
    }
}

/// Offer `archive` to the user as a file download.
pub(crate) fn save(archive: &Archive) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let blob = bytes_to_blob(&archive.bytes, Archive::MIME)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Failed to create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(&archive.name);
    anchor.click();

    let revoke = Closure::once_into_js(move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("failed to revoke download url: {}", describe(&e));
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        revoke.unchecked_ref(),
        REVOKE_DELAY_MS,
    )?;

    log::info!("saved {} ({} bytes)", archive.name, archive.bytes.len());
    Ok(())
}
