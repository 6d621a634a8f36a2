//! Object URLs as display handles.

use batchcrop_core::upload::{DisplayHandle, DisplayHandles, HandleError};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Display handles backed by `URL.createObjectURL`.
///
/// Every handle is revoked with `URL.revokeObjectURL` when the session
/// discards it.
#[derive(Debug, Default)]
pub struct ObjectUrlHandles;

impl DisplayHandles for ObjectUrlHandles {
    fn allocate(&mut self, bytes: &[u8], mime: &str) -> Result<DisplayHandle, HandleError> {
        let blob = bytes_to_blob(bytes, mime).map_err(|e| HandleError(describe(&e)))?;
        Url::create_object_url_with_blob(&blob)
            .map(DisplayHandle::new)
            .map_err(|e| HandleError(describe(&e)))
    }

    fn release(&mut self, handle: &DisplayHandle) {
        if let Err(e) = Url::revoke_object_url(handle.as_str()) {
            log::warn!("failed to revoke {}: {}", handle.as_str(), describe(&e));
        }
    }
}

/// Copy `bytes` into a new `Blob` of type `mime`.
pub(crate) fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
