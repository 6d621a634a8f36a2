//! Crop selection on the reference image.
//!
//! While the user drags, the page reports the rectangle on every pointer move
//! (the *live* region) and once more when the gesture ends (the *committed*
//! region). Only the committed region is ever cropped with.

use crate::decode::Dimensions;
use crate::region::CropRegion;

/// Initial crop for a freshly uploaded reference image.
///
/// The region is centered and `width_percent` of the image wide. With an
/// `aspect` ratio (width / height, measured in natural pixels) the height is
/// derived from it; otherwise the height uses the same percentage. The height
/// is capped at 100%, shrinking the width to keep the aspect ratio.
pub fn default_region(natural: Dimensions, aspect: Option<f64>, width_percent: f64) -> CropRegion {
    let mut width = width_percent.clamp(0.0, 100.0);
    let mut height = match aspect {
        Some(ratio) if ratio > 0.0 && natural.height > 0 => {
            width * natural.width as f64 / ratio / natural.height as f64
        }
        _ => width,
    };

    if height > 100.0 {
        width *= 100.0 / height;
        height = 100.0;
    }

    CropRegion::percent(
        (100.0 - width) / 2.0,
        (100.0 - height) / 2.0,
        width,
        height,
    )
}

/// Live and committed crop state for the reference image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropSelector {
    live: Option<CropRegion>,
    committed: Option<CropRegion>,
}

impl CropSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the rectangle while the user drags.
    pub fn update(&mut self, region: CropRegion) {
        self.live = Some(region);
    }

    /// Commit the rectangle at the end of a gesture.
    pub fn complete(&mut self, region: CropRegion) {
        self.live = Some(region);
        self.committed = Some(region);
    }

    pub fn live(&self) -> Option<&CropRegion> {
        self.live.as_ref()
    }

    pub fn committed(&self) -> Option<&CropRegion> {
        self.committed.as_ref()
    }

    pub fn clear(&mut self) {
        self.live = None;
        self.committed = None;
    }
}
