//! The batch crop session.
//!
//! Holds everything the page works with (uploads, crop selection, results)
//! and moves through a fixed set of states:
//!
//! ```text
//! Idle → ImagesLoaded → RegionSelected → Cropped → Archived
//! ```
//!
//! `upload` and `reset` are accepted in every state. Whenever uploads or
//! results are discarded their display handles are released.

use crate::archive::{self, Archive};
use crate::batch::{BatchCropper, BatchInput, BatchReport, CroppedResult};
use crate::decode::{probe_dimensions, Dimensions};
use crate::error::{Action, CropError, ValidationError};
use crate::options::BatchOptions;
use crate::region::{CropRegion, DisplaySize};
use crate::selector::{default_region, CropSelector};
use crate::upload::{self, DisplayHandles, SourceImage, UploadFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    ImagesLoaded,
    RegionSelected,
    Cropped,
    Archived,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::ImagesLoaded => "images are loaded",
            SessionState::RegionSelected => "a region is selected",
            SessionState::Cropped => "cropped",
            SessionState::Archived => "archived",
        };
        f.write_str(name)
    }
}

pub struct Session<H: DisplayHandles> {
    options: BatchOptions,
    handles: H,
    state: SessionState,
    sources: Vec<SourceImage>,
    reference: Option<Dimensions>,
    displayed: Option<DisplaySize>,
    selector: CropSelector,
    results: Vec<CroppedResult>,
    last_report: Option<BatchReport>,
}

impl<H: DisplayHandles> Session<H> {
    pub fn new(options: BatchOptions, handles: H) -> Self {
        Self {
            options,
            handles,
            state: SessionState::Idle,
            sources: Vec::new(),
            reference: None,
            displayed: None,
            selector: CropSelector::new(),
            results: Vec::new(),
            last_report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn handles(&self) -> &H {
        &self.handles
    }

    pub fn sources(&self) -> &[SourceImage] {
        &self.sources
    }

    /// Natural size of the reference (first) image, if it could be read.
    pub fn reference(&self) -> Option<Dimensions> {
        self.reference
    }

    pub fn selector(&self) -> &CropSelector {
        &self.selector
    }

    pub fn results(&self) -> &[CroppedResult] {
        &self.results
    }

    /// Report of the last successful batch run.
    pub fn last_report(&self) -> Option<&BatchReport> {
        self.last_report.as_ref()
    }

    /// Replace the upload set.
    ///
    /// Everything from the previous set is discarded first. The first
    /// accepted file becomes the reference image; when its size can be read
    /// the default crop is installed as the live region. When it cannot, the
    /// session still loads but starts without a crop.
    pub fn upload(&mut self, files: Vec<UploadFile>) -> Result<(), CropError> {
        let sources = upload::collect(files, &mut self.handles)?;
        self.clear();

        self.reference = match probe_dimensions(&sources[0].bytes, self.options.apply_exif_orientation)
        {
            Ok(dims) => {
                log::debug!("reference {} is {}", sources[0].name, dims);
                Some(dims)
            }
            Err(e) => {
                log::warn!("cannot read reference image {}: {}", sources[0].name, e);
                None
            }
        };
        if let Some(dims) = self.reference {
            self.selector.update(default_region(
                dims,
                self.options.default_aspect,
                self.options.default_width_percent,
            ));
        }

        self.sources = sources;
        self.state = SessionState::ImagesLoaded;
        Ok(())
    }

    /// Record the size the reference image is rendered at.
    pub fn set_display_size(&mut self, displayed: DisplaySize) {
        self.displayed = Some(displayed);
    }

    /// Track the rectangle while the user drags.
    pub fn update_crop(&mut self, region: CropRegion) -> Result<(), CropError> {
        self.require_images(Action::UpdateCrop)?;
        self.selector.update(region);
        Ok(())
    }

    /// Commit the rectangle at the end of a gesture.
    ///
    /// Results of an earlier run no longer match the selection and are
    /// discarded.
    pub fn complete_crop(&mut self, region: CropRegion) -> Result<(), CropError> {
        self.require_images(Action::CompleteCrop)?;
        self.selector.complete(region);
        self.discard_results();
        self.state = SessionState::RegionSelected;
        Ok(())
    }

    /// Crop every uploaded image with the committed rectangle.
    ///
    /// Previous results are discarded before the run. On failure the
    /// session is left with no results and the selection intact.
    pub fn crop_all(&mut self) -> Result<&BatchReport, CropError> {
        if self.state == SessionState::Idle || self.state == SessionState::ImagesLoaded {
            // Validation errors read better than a transition error here
            if self.selector.committed().is_none() {
                return Err(ValidationError::NoCommittedRegion.into());
            }
            return Err(self.invalid(Action::CropAll));
        }

        self.discard_results();
        self.state = SessionState::RegionSelected;

        let input = BatchInput {
            sources: &self.sources,
            reference: self.reference,
            committed: self.selector.committed(),
            displayed: self.displayed,
        };
        let outcome = BatchCropper::new(&self.options).run(&input)?;

        let mut results = outcome.results;
        let mut previews = Vec::with_capacity(results.len());
        for result in &results {
            match self.handles.allocate(&result.png, "image/png") {
                Ok(handle) => previews.push(handle),
                Err(e) => {
                    upload::release_all(&mut self.handles, &previews);
                    return Err(e.into());
                }
            }
        }
        for (result, handle) in results.iter_mut().zip(previews) {
            result.display_handle = Some(handle);
        }

        self.results = results;
        self.state = SessionState::Cropped;
        Ok(self.last_report.insert(outcome.report))
    }

    /// Bundle the current results into an archive.
    pub fn export(&mut self) -> Result<Archive, CropError> {
        match self.state {
            SessionState::Cropped | SessionState::Archived => {}
            _ if self.results.is_empty() => return Err(ValidationError::NoResults.into()),
            _ => return Err(self.invalid(Action::Export)),
        }

        let archive = archive::export(&self.results, &self.options.archive_name)?;
        self.state = SessionState::Archived;
        Ok(archive)
    }

    /// Drop everything and return to `Idle`.
    pub fn reset(&mut self) {
        self.clear();
        log::debug!("session reset");
    }

    fn clear(&mut self) {
        self.discard_results();
        upload::release_all(
            &mut self.handles,
            self.sources.iter().map(|s| &s.display_handle),
        );
        self.sources.clear();
        self.reference = None;
        self.displayed = None;
        self.selector.clear();
        self.state = SessionState::Idle;
    }

    fn discard_results(&mut self) {
        upload::release_all(
            &mut self.handles,
            self.results.iter().filter_map(|r| r.display_handle.as_ref()),
        );
        self.results.clear();
        self.last_report = None;
    }

    fn require_images(&self, action: Action) -> Result<(), CropError> {
        if self.state == SessionState::Idle {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn invalid(&self, action: Action) -> CropError {
        CropError::InvalidTransition {
            from: self.state,
            action,
        }
    }
}

impl<H: DisplayHandles> Drop for Session<H> {
    fn drop(&mut self) {
        self.clear();
    }
}
