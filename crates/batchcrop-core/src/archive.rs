//! Zip export of cropped results.
//!
//! Entries are stored rather than deflated: PNG data is already compressed.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::CroppedResult;
use crate::error::{CropError, ValidationError};

/// Failure while writing the archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished archive, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Archive {
    pub const MIME: &'static str = "application/zip";
}

/// Bundle every result into one zip archive named `archive_name`.
///
/// Each result becomes one entry named by its output name.
///
/// # Errors
///
/// `ValidationError::NoResults` when `results` is empty.
pub fn export(results: &[CroppedResult], archive_name: &str) -> Result<Archive, CropError> {
    if results.is_empty() {
        return Err(ValidationError::NoResults.into());
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for result in results {
        writer
            .start_file(result.output_name.as_str(), options)
            .map_err(ArchiveError::from)?;
        writer.write_all(&result.png).map_err(ArchiveError::from)?;
    }

    let bytes = writer.finish().map_err(ArchiveError::from)?.into_inner();
    log::info!(
        "archived {} entries into {} ({} bytes)",
        results.len(),
        archive_name,
        bytes.len()
    );

    Ok(Archive {
        name: archive_name.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn result(output_name: &str, png: Vec<u8>) -> CroppedResult {
        CroppedResult {
            original_name: output_name.to_string(),
            output_name: output_name.to_string(),
            width: 1,
            height: 1,
            png,
            display_handle: None,
        }
    }

    #[test]
    fn test_export_one_entry_per_result() {
        let results = vec![
            result("cropped_a.png", vec![1, 2, 3]),
            result("cropped_b.png", vec![4, 5]),
            result("cropped_c.png", vec![6]),
        ];
        let archive = export(&results, "cropped-images.zip").unwrap();
        assert_eq!(archive.name, "cropped-images.zip");

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert_eq!(zip.len(), results.len());

        for (i, expected) in results.iter().enumerate() {
            let mut entry = zip.by_index(i).unwrap();
            assert_eq!(entry.name(), expected.output_name);
            assert_eq!(entry.compression(), CompressionMethod::Stored);

            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            assert_eq!(contents, expected.png);
        }
    }

    #[test]
    fn test_export_requires_results() {
        let result = export(&[], "cropped-images.zip");
        assert!(matches!(
            result,
            Err(CropError::Validation(ValidationError::NoResults))
        ));
    }

    #[test]
    fn test_export_duplicate_names_fail() {
        let results = vec![
            result("cropped_a.png", vec![1]),
            result("cropped_a.png", vec![2]),
        ];
        assert!(matches!(
            export(&results, "cropped-images.zip"),
            Err(CropError::Archive(_))
        ));
    }

    #[test]
    fn test_export_custom_name() {
        let archive = export(&[result("x.png", vec![0])], "batch.zip").unwrap();
        assert_eq!(archive.name, "batch.zip");
        // Local file header signature
        assert_eq!(&archive.bytes[0..4], b"PK\x03\x04");
    }
}
