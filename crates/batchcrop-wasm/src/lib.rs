//! Batch Crop WASM - WebAssembly bindings for the batch crop page
//!
//! This crate exposes batchcrop-core to JavaScript/TypeScript through a
//! single [`JsCropSession`] object.
//!
//! # Module Structure
//!
//! - `session` - The crop session (upload, select, crop, download)
//! - `types` - WASM-compatible wrapper types for uploads and batch summaries
//! - `handles` - Object URLs as display handles
//! - `notify` - Alerts and archive downloads
//! - `logging` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, JsUploadBatch } from '@batchcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const batch = new JsUploadBatch();
//! for (const file of input.files) {
//!   batch.push(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! }
//!
//! const session = new JsCropSession();
//! session.upload(batch);
//! ```

use wasm_bindgen::prelude::*;

mod handles;
mod logging;
mod notify;
mod session;
mod types;

// Re-export public types
pub use handles::ObjectUrlHandles;
pub use logging::set_log_level;
pub use session::JsCropSession;
pub use types::JsUploadBatch;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
