//! JS-facing wrapper types.
//!
//! Uploads are handed over one file at a time through [`JsUploadBatch`];
//! batch reports come back as plain objects.

use batchcrop_core::{BatchReport, UploadFile};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Files selected on the page, collected before they are uploaded.
///
/// ```typescript
/// const batch = new JsUploadBatch();
/// for (const file of files) {
///   batch.push(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
/// }
/// session.upload(batch);
/// ```
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct JsUploadBatch {
    files: Vec<UploadFile>,
}

#[wasm_bindgen]
impl JsUploadBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsUploadBatch {
        JsUploadBatch::default()
    }

    /// Add one file: its name, MIME type and contents.
    pub fn push(&mut self, name: String, mime: String, bytes: Vec<u8>) {
        self.files.push(UploadFile::new(name, mime, bytes));
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.files.len()
    }
}

impl JsUploadBatch {
    pub(crate) fn into_files(self) -> Vec<UploadFile> {
        self.files
    }
}

/// Plain-object form of a batch report.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct FailureSummary {
    pub name: String,
    pub message: String,
}

impl From<&BatchReport> for BatchSummary {
    fn from(report: &BatchReport) -> Self {
        Self {
            total: report.total,
            succeeded: report.succeeded,
            failures: report
                .failures
                .iter()
                .map(|f| FailureSummary {
                    name: f.name.clone(),
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}

impl BatchSummary {
    /// Alert text for a run that lost some images, if any were lost.
    pub fn partial_failure_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.failures.iter().map(|f| f.name.as_str()).collect();
        Some(format!(
            "{} of {} images could not be cropped: {}",
            self.failures.len(),
            self.total,
            names.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchcrop_core::decode::DecodeError;
    use batchcrop_core::{CropError, ItemFailure};

    #[test]
    fn test_upload_batch_push() {
        let mut batch = JsUploadBatch::new();
        batch.push("a.png".to_string(), "image/png".to_string(), vec![1, 2]);
        batch.push("b.txt".to_string(), "text/plain".to_string(), vec![]);
        assert_eq!(batch.length(), 2);

        let files = batch.into_files();
        assert_eq!(files[0], UploadFile::new("a.png", "image/png", vec![1, 2]));
        assert!(!files[1].is_image());
    }

    #[test]
    fn test_summary_from_complete_report() {
        let report = BatchReport {
            total: 3,
            succeeded: 3,
            failures: Vec::new(),
        };
        let summary = BatchSummary::from(&report);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.partial_failure_message(), None);
    }

    #[test]
    fn test_summary_lists_failures() {
        let report = BatchReport {
            total: 3,
            succeeded: 1,
            failures: vec![
                ItemFailure {
                    index: 0,
                    name: "a.png".to_string(),
                    error: CropError::Decode {
                        name: "a.png".to_string(),
                        source: DecodeError::InvalidFormat,
                    },
                },
                ItemFailure {
                    index: 2,
                    name: "c.png".to_string(),
                    error: CropError::Decode {
                        name: "c.png".to_string(),
                        source: DecodeError::InvalidFormat,
                    },
                },
            ],
        };
        let summary = BatchSummary::from(&report);
        assert_eq!(
            summary.failures[0].message,
            "Failed to decode a.png: Invalid or unsupported image format"
        );
        assert_eq!(
            summary.partial_failure_message().unwrap(),
            "2 of 3 images could not be cropped: a.png, c.png"
        );
    }
}
