//! Batch cropping.
//!
//! One committed rectangle is rescaled into the reference image's native
//! pixel space once per run, then every source image is decoded, cropped and
//! encoded on its own. The per-image pipelines share nothing but that
//! read-only rectangle and run on the rayon pool; results are collected
//! positionally, so output order always matches upload order.

use rayon::prelude::*;

use crate::decode::{decode_image, Dimensions};
use crate::encode::encode_image;
use crate::error::{CropError, ValidationError};
use crate::naming::assign_output_names;
use crate::options::{BatchOptions, DimensionPolicy, FailurePolicy};
use crate::region::{to_pixel_region, CropRegion, DisplaySize, PixelCropRegion, ScaleFactors};
use crate::transform::crop_region;
use crate::upload::{DisplayHandle, SourceImage};

/// One cropped output.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedResult {
    pub original_name: String,
    pub output_name: String,
    pub width: u32,
    pub height: u32,
    /// PNG-encoded crop.
    pub png: Vec<u8>,
    /// Set once the session has allocated a preview handle for this result.
    pub display_handle: Option<DisplayHandle>,
}

/// An image that failed under [`FailurePolicy::PerItem`].
#[derive(Debug)]
pub struct ItemFailure {
    pub index: usize,
    pub name: String,
    pub error: CropError,
}

/// Aggregate outcome of one run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<CroppedResult>,
    pub report: BatchReport,
}

/// Everything a run reads.
#[derive(Debug, Clone, Copy)]
pub struct BatchInput<'a> {
    pub sources: &'a [SourceImage],
    /// Natural size of the reference image, once it has been probed.
    pub reference: Option<Dimensions>,
    /// The rectangle committed by the user.
    pub committed: Option<&'a CropRegion>,
    /// Size the reference image is rendered at.
    pub displayed: Option<DisplaySize>,
}

pub struct BatchCropper<'a> {
    options: &'a BatchOptions,
}

impl<'a> BatchCropper<'a> {
    pub fn new(options: &'a BatchOptions) -> Self {
        Self { options }
    }

    /// Check the inputs and compute the pixel-space rectangle for this run.
    ///
    /// # Errors
    ///
    /// A `ValidationError` if there is no committed region, the reference
    /// image has not been rendered, there are no sources, or the scaled
    /// region is empty or misses the reference image entirely.
    ///
    /// The returned region is clipped to the reference image, so no output is
    /// ever larger than the reference.
    pub fn prepare(&self, input: &BatchInput<'_>) -> Result<PixelCropRegion, CropError> {
        let committed = input.committed.ok_or(ValidationError::NoCommittedRegion)?;
        let (reference, displayed) = match (input.reference, input.displayed) {
            (Some(reference), Some(displayed)) => (reference, displayed),
            _ => return Err(ValidationError::ReferenceNotRendered.into()),
        };
        if input.sources.is_empty() {
            return Err(ValidationError::NoImages.into());
        }

        let scale = ScaleFactors::new(reference, displayed)?;
        let scaled = to_pixel_region(committed, displayed, scale)?;
        let region = scaled
            .clamp_to(reference)
            .ok_or(ValidationError::RegionOutOfBounds)?;
        let (width, height) = region.output_size();
        if width == 0 || height == 0 {
            return Err(ValidationError::EmptyRegion.into());
        }
        if region != scaled {
            log::warn!("crop region {:?} clipped to reference {}", scaled, reference);
        }
        log::debug!(
            "scale {:.4}x{:.4}, pixel region {:?} on reference {}",
            scale.x,
            scale.y,
            region,
            reference
        );
        Ok(region)
    }

    /// Crop every source image with the committed rectangle.
    ///
    /// Under [`FailurePolicy::AllOrNothing`] the first failure is returned and
    /// no results are kept. Under [`FailurePolicy::PerItem`] failures are
    /// collected into the report; the run only fails if no image succeeded.
    pub fn run(&self, input: &BatchInput<'_>) -> Result<BatchOutcome, CropError> {
        let region = self.prepare(input)?;
        let reference = input.reference.ok_or(ValidationError::ReferenceNotRendered)?;
        let names = assign_output_names(
            input.sources.iter().map(|s| s.name.as_str()),
            &self.options.output_prefix,
            self.options.collision_policy,
        )?;

        let jobs = input.sources.par_iter().zip(names.into_par_iter());
        let total = input.sources.len();

        let outcome = match self.options.failure_policy {
            FailurePolicy::AllOrNothing => {
                let results = jobs
                    .map(|(source, name)| self.crop_source(source, name, &region, reference))
                    .collect::<Result<Vec<_>, _>>()?;
                BatchOutcome {
                    report: BatchReport {
                        total,
                        succeeded: results.len(),
                        failures: Vec::new(),
                    },
                    results,
                }
            }
            FailurePolicy::PerItem => {
                let attempts: Vec<_> = jobs
                    .map(|(source, name)| self.crop_source(source, name, &region, reference))
                    .collect();
                split_attempts(input.sources, attempts)?
            }
        };

        log::info!(
            "cropped {}/{} image(s)",
            outcome.report.succeeded,
            outcome.report.total
        );
        Ok(outcome)
    }

    fn crop_source(
        &self,
        source: &SourceImage,
        output_name: String,
        region: &PixelCropRegion,
        reference: Dimensions,
    ) -> Result<CroppedResult, CropError> {
        let image = decode_image(&source.bytes, self.options.apply_exif_orientation).map_err(
            |e| CropError::Decode {
                name: source.name.clone(),
                source: e,
            },
        )?;
        let actual = image.dimensions();

        let region = match self.options.dimension_policy {
            DimensionPolicy::AssumeUniform => *region,
            DimensionPolicy::RequireUniform if actual != reference => {
                return Err(ValidationError::DimensionMismatch {
                    name: source.name.clone(),
                    expected: reference,
                    actual,
                }
                .into());
            }
            DimensionPolicy::RequireUniform => *region,
            DimensionPolicy::Relative => region.rescale(reference, actual),
        };
        if !region.fits_within(actual) {
            log::debug!("{}: region extends past {actual}", source.name);
        }

        let encode_err = |e| CropError::Encode {
            name: source.name.clone(),
            source: e,
        };
        let cropped = crop_region(&image, &region).map_err(encode_err)?;
        let png = encode_image(&cropped).map_err(encode_err)?;
        log::debug!(
            "{} -> {} ({}x{}, {} bytes)",
            source.name,
            output_name,
            cropped.width,
            cropped.height,
            png.len()
        );

        Ok(CroppedResult {
            original_name: source.name.clone(),
            output_name,
            width: cropped.width,
            height: cropped.height,
            png,
            display_handle: None,
        })
    }
}

fn split_attempts(
    sources: &[SourceImage],
    attempts: Vec<Result<CroppedResult, CropError>>,
) -> Result<BatchOutcome, CropError> {
    let total = attempts.len();
    let mut results = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, attempt) in attempts.into_iter().enumerate() {
        match attempt {
            Ok(result) => results.push(result),
            Err(error) => {
                log::warn!("{}: {}", sources[index].name, error);
                failures.push(ItemFailure {
                    index,
                    name: sources[index].name.clone(),
                    error,
                });
            }
        }
    }

    if results.is_empty() && !failures.is_empty() {
        return Err(failures.swap_remove(0).error);
    }

    Ok(BatchOutcome {
        report: BatchReport {
            total,
            succeeded: results.len(),
            failures,
        },
        results,
    })
}
