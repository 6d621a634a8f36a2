//! The page-facing crop session.
//!
//! Wraps the core [`Session`] with object-URL display handles. Operations the
//! user triggers directly (upload, crop all, download) raise a blocking alert
//! when they fail, then return the error to the caller.
//!
//! ```typescript
//! const session = new JsCropSession({ failurePolicy: 'per-item' });
//! session.upload(batch);
//! img.src = session.reference_url();
//!
//! // when the reference image has rendered
//! session.set_display_size(img.width, img.height);
//!
//! // from the crop widget
//! session.update_crop(crop);      // onChange
//! session.complete_crop(crop);    // onComplete
//!
//! const summary = session.crop_all();
//! session.download_all();
//! ```

use batchcrop_core::{BatchOptions, CropError, CropRegion, DisplaySize, Session};
use wasm_bindgen::prelude::*;

use crate::handles::ObjectUrlHandles;
use crate::notify;
use crate::types::{BatchSummary, JsUploadBatch};

#[wasm_bindgen]
pub struct JsCropSession {
    inner: Session<ObjectUrlHandles>,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session. `options` is an optional object of batch options
    /// (`outputPrefix`, `archiveName`, `defaultWidthPercent`,
    /// `defaultAspect`, `failurePolicy`, `dimensionPolicy`,
    /// `collisionPolicy`, `applyExifOrientation`).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsCropSession, JsValue> {
        let options = parse_options(options)?;
        Ok(JsCropSession {
            inner: Session::new(options, ObjectUrlHandles),
        })
    }

    /// Current state: "idle", "images-loaded", "region-selected", "cropped" or "archived".
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    /// Replace the uploaded images. Non-image files are skipped.
    pub fn upload(&mut self, batch: JsUploadBatch) -> Result<(), JsValue> {
        self.inner.upload(batch.into_files()).map_err(alert_error)
    }

    #[wasm_bindgen(getter)]
    pub fn source_count(&self) -> usize {
        self.inner.sources().len()
    }

    /// Object URL of the uploaded image at `index`.
    pub fn source_url(&self, index: usize) -> Option<String> {
        self.inner
            .sources()
            .get(index)
            .map(|s| s.display_handle.as_str().to_string())
    }

    /// Object URL of the image the crop is drawn on.
    pub fn reference_url(&self) -> Option<String> {
        self.source_url(0)
    }

    /// The live crop region as `{ unit, x, y, width, height }`, or `undefined`.
    pub fn live_crop(&self) -> Result<JsValue, JsValue> {
        region_to_js(self.inner.selector().live())
    }

    /// The committed crop region, or `undefined`.
    pub fn committed_crop(&self) -> Result<JsValue, JsValue> {
        region_to_js(self.inner.selector().committed())
    }

    /// Record the size the reference image is rendered at.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.inner.set_display_size(DisplaySize::new(width, height));
    }

    /// Track the crop region while the user drags.
    pub fn update_crop(&mut self, region: JsValue) -> Result<(), JsValue> {
        let region = parse_region(region)?;
        self.inner.update_crop(region).map_err(to_js_error)
    }

    /// Commit the crop region at the end of a drag.
    pub fn complete_crop(&mut self, region: JsValue) -> Result<(), JsValue> {
        let region = parse_region(region)?;
        self.inner.complete_crop(region).map_err(to_js_error)
    }

    /// Crop every uploaded image with the committed region.
    ///
    /// Returns `{ total, succeeded, failures: [{ name, message }] }`.
    pub fn crop_all(&mut self) -> Result<JsValue, JsValue> {
        let summary = match self.inner.crop_all() {
            Ok(report) => BatchSummary::from(report),
            Err(e) => return Err(alert_error(e)),
        };
        if let Some(message) = summary.partial_failure_message() {
            notify::alert(&message);
        }
        serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn result_count(&self) -> usize {
        self.inner.results().len()
    }

    /// Object URL of the cropped image at `index`.
    pub fn result_url(&self, index: usize) -> Option<String> {
        self.inner
            .results()
            .get(index)
            .and_then(|r| r.display_handle.as_ref())
            .map(|h| h.as_str().to_string())
    }

    /// File name the cropped image at `index` gets inside the archive.
    pub fn result_name(&self, index: usize) -> Option<String> {
        self.inner
            .results()
            .get(index)
            .map(|r| r.output_name.clone())
    }

    /// PNG bytes of the cropped image at `index`.
    pub fn result_png(&self, index: usize) -> Option<Vec<u8>> {
        self.inner.results().get(index).map(|r| r.png.clone())
    }

    /// Build the zip archive and return its bytes.
    pub fn export_archive(&mut self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export()
            .map(|archive| archive.bytes)
            .map_err(alert_error)
    }

    #[wasm_bindgen(getter)]
    pub fn archive_name(&self) -> String {
        self.inner.options().archive_name.clone()
    }

    /// Build the zip archive and save it as a download.
    pub fn download_all(&mut self) -> Result<(), JsValue> {
        let archive = self.inner.export().map_err(alert_error)?;
        notify::save(&archive)
    }

    /// Discard all uploads, selection and results.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Explicitly free WASM memory and revoke every object URL.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping the session releases its handles
    }
}

fn parse_options(value: JsValue) -> Result<BatchOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(BatchOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))
}

fn parse_region(value: JsValue) -> Result<CropRegion, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop region: {}", e)))
}

fn region_to_js(region: Option<&CropRegion>) -> Result<JsValue, JsValue> {
    match region {
        Some(region) => {
            serde_wasm_bindgen::to_value(region).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(JsValue::UNDEFINED),
    }
}

fn state_name(state: batchcrop_core::SessionState) -> &'static str {
    use batchcrop_core::SessionState::*;
    match state {
        Idle => "idle",
        ImagesLoaded => "images-loaded",
        RegionSelected => "region-selected",
        Cropped => "cropped",
        Archived => "archived",
    }
}

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Interrupt the user with the error, then hand it back to the caller.
fn alert_error(err: CropError) -> JsValue {
    if err.is_validation() {
        log::warn!("{}", err);
    } else {
        log::error!("{}", err);
    }
    let message = err.to_string();
    notify::alert(&message);
    JsValue::from_str(&message)
}
