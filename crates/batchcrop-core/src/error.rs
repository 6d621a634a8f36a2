//! Error taxonomy for the batch crop pipeline.
//!
//! Validation failures are raised before any work is done. Decode and encode
//! failures carry the name of the file that caused them so the page can say
//! which image broke the batch.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::decode::{DecodeError, Dimensions};
use crate::encode::EncodeError;
use crate::session::SessionState;
use crate::upload::HandleError;

/// A precondition of an operation was not met. No side effects were performed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("No images have been uploaded")]
    NoImages,

    #[error("No crop region has been selected")]
    NoCommittedRegion,

    #[error("The reference image has not been rendered")]
    ReferenceNotRendered,

    #[error("The crop region is empty")]
    EmptyRegion,

    #[error("The crop region lies outside the reference image")]
    RegionOutOfBounds,

    #[error("There are no cropped images to export")]
    NoResults,

    #[error("{name} is {actual}, expected {expected} like the reference image")]
    DimensionMismatch {
        name: String,
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Duplicate output name: {0}")]
    DuplicateName(String),
}

/// Session actions, used to report rejected transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateCrop,
    CompleteCrop,
    CropAll,
    Export,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::UpdateCrop => "update crop",
            Action::CompleteCrop => "complete crop",
            Action::CropAll => "crop all",
            Action::Export => "export",
        };
        f.write_str(name)
    }
}

/// Top-level error returned by every fallible batch crop operation.
#[derive(Debug, Error)]
pub enum CropError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: EncodeError,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: SessionState, action: Action },
}

impl CropError {
    /// True for errors that mean the user has to do something first.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CropError::Validation(_) | CropError::InvalidTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::NoCommittedRegion.to_string(),
            "No crop region has been selected"
        );
        let err = ValidationError::DimensionMismatch {
            name: "b.png".to_string(),
            expected: Dimensions::new(1000, 800),
            actual: Dimensions::new(800, 600),
        };
        assert_eq!(
            err.to_string(),
            "b.png is 800x600, expected 1000x800 like the reference image"
        );
    }

    #[test]
    fn test_decode_error_names_file() {
        let err = CropError::Decode {
            name: "broken.jpg".to_string(),
            source: DecodeError::InvalidFormat,
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode broken.jpg: Invalid or unsupported image format"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = CropError::from(ValidationError::NoImages);
        assert_eq!(err.to_string(), "No images have been uploaded");
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = CropError::InvalidTransition {
            from: SessionState::Idle,
            action: Action::Export,
        };
        assert_eq!(err.to_string(), "Cannot export while idle");
    }
}
