//! Batch options.
//!
//! Every field has a default, so the page may pass a partial object (or
//! nothing) and get the stock behaviour: `cropped_<stem>.png` entries inside
//! `cropped-images.zip`, a 50% centered default crop, and an all-or-nothing
//! batch.

use serde::{Deserialize, Serialize};

/// What a batch does when one image fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any failure fails the whole batch and no results are kept.
    #[default]
    AllOrNothing,
    /// Keep every image that succeeded and report the ones that did not.
    PerItem,
}

/// How the shared rectangle is applied to images whose size differs from the
/// reference image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionPolicy {
    /// Apply the same pixel rectangle to every image, whatever its size.
    #[default]
    AssumeUniform,
    /// Fail images whose natural size differs from the reference.
    RequireUniform,
    /// Apply the rectangle as the same fraction of each image's own size.
    Relative,
}

/// What happens when two inputs map to the same output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Append `_2`, `_3`, ... to later duplicates.
    #[default]
    AppendIndex,
    /// Fail the batch with `ValidationError::DuplicateName`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    /// Prefix of every output file name.
    pub output_prefix: String,
    /// File name of the downloaded archive.
    pub archive_name: String,
    /// Width of the initial crop, in percent of the reference width.
    pub default_width_percent: f64,
    /// Aspect ratio (width / height) to lock the initial crop to.
    pub default_aspect: Option<f64>,
    pub failure_policy: FailurePolicy,
    pub dimension_policy: DimensionPolicy,
    pub collision_policy: CollisionPolicy,
    /// Honour EXIF orientation when decoding, as browsers do.
    pub apply_exif_orientation: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_prefix: "cropped_".to_string(),
            archive_name: "cropped-images.zip".to_string(),
            default_width_percent: 50.0,
            default_aspect: None,
            failure_policy: FailurePolicy::default(),
            dimension_policy: DimensionPolicy::default(),
            collision_policy: CollisionPolicy::default(),
            apply_exif_orientation: true,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = BatchOptions::new();
        assert_eq!(opts.output_prefix, "cropped_");
        assert_eq!(opts.archive_name, "cropped-images.zip");
        assert_eq!(opts.default_width_percent, 50.0);
        assert_eq!(opts.default_aspect, None);
        assert_eq!(opts.failure_policy, FailurePolicy::AllOrNothing);
        assert_eq!(opts.dimension_policy, DimensionPolicy::AssumeUniform);
        assert_eq!(opts.collision_policy, CollisionPolicy::AppendIndex);
        assert!(opts.apply_exif_orientation);
    }
}
