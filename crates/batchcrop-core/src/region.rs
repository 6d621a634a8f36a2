//! Crop rectangles and display-to-native scaling.
//!
//! The user draws a rectangle over the reference image as it is rendered on
//! the page. Before any pixels are touched that rectangle is rescaled into the
//! reference image's native pixel space using independent horizontal and
//! vertical scale factors:
//!
//! ```text
//! scale_x = natural_width  / displayed_width
//! scale_y = natural_height / displayed_height
//! ```
//!
//! `x` and `width` are multiplied by `scale_x`, `y` and `height` by `scale_y`.

use serde::{Deserialize, Serialize};

use crate::decode::Dimensions;
use crate::error::ValidationError;

/// Unit of a [`CropRegion`].
///
/// Serialized as `"%"` and `"px"` so region objects coming from the page
/// deserialize directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropUnit {
    /// Percentage (0-100) of the displayed size.
    #[serde(rename = "%")]
    Percent,
    /// Pixels at the displayed size.
    #[default]
    #[serde(rename = "px")]
    Pixels,
}

/// A rectangle in the reference image's display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    #[serde(default)]
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Pixels,
            x,
            y,
            width,
            height,
        }
    }

    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// Express this region in pixels at the given displayed size.
    pub fn to_display_pixels(&self, displayed: DisplaySize) -> CropRegion {
        match self.unit {
            CropUnit::Pixels => *self,
            CropUnit::Percent => CropRegion::pixels(
                self.x / 100.0 * displayed.width,
                self.y / 100.0 * displayed.height,
                self.width / 100.0 * displayed.width,
                self.height / 100.0 * displayed.height,
            ),
        }
    }
}

/// Rendered size of the reference image on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_rendered(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Ratio between an image's native size and its displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Scale factors for a reference image of `natural` size rendered at
    /// `displayed` size.
    ///
    /// # Errors
    ///
    /// `ValidationError::ReferenceNotRendered` when the displayed size is zero,
    /// negative or not finite.
    pub fn new(natural: Dimensions, displayed: DisplaySize) -> Result<Self, ValidationError> {
        if !displayed.is_rendered() {
            return Err(ValidationError::ReferenceNotRendered);
        }
        Ok(Self {
            x: natural.width as f64 / displayed.width,
            y: natural.height as f64 / displayed.height,
        })
    }
}

/// A crop rectangle in native pixel space.
///
/// Coordinates stay fractional; the cropper decides how to snap them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelCropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelCropRegion {
    /// Size of the output raster: the fractional part of each side is dropped,
    /// as assigning a fractional size to a canvas does.
    pub fn output_size(&self) -> (u32, u32) {
        (floor_to_u32(self.width), floor_to_u32(self.height))
    }

    /// Re-express this region, measured against an image of size `from`, as
    /// the same fraction of an image of size `to`.
    pub fn rescale(&self, from: Dimensions, to: Dimensions) -> PixelCropRegion {
        if from == to {
            return *self;
        }
        let sx = to.width as f64 / from.width.max(1) as f64;
        let sy = to.height as f64 / from.height.max(1) as f64;
        PixelCropRegion {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// True when the region lies entirely inside an image of size `bounds`.
    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= bounds.width as f64
            && self.y + self.height <= bounds.height as f64
    }

    /// The part of this region that lies inside an image of size `bounds`, or
    /// `None` when the two do not overlap.
    pub fn clamp_to(&self, bounds: Dimensions) -> Option<PixelCropRegion> {
        let edges = [self.x, self.y, self.width, self.height];
        if edges.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(bounds.width as f64);
        let bottom = (self.y + self.height).min(bounds.height as f64);
        if right <= left || bottom <= top {
            return None;
        }
        Some(PixelCropRegion {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

fn floor_to_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Rescale a committed display-space region into native pixel space.
///
/// # Errors
///
/// `ValidationError::EmptyRegion` when the scaled rectangle would produce an
/// output raster with no pixels.
pub fn to_pixel_region(
    region: &CropRegion,
    displayed: DisplaySize,
    scale: ScaleFactors,
) -> Result<PixelCropRegion, ValidationError> {
    let region = region.to_display_pixels(displayed);
    let pixel = PixelCropRegion {
        x: region.x * scale.x,
        y: region.y * scale.y,
        width: region.width * scale.x,
        height: region.height * scale.y,
    };

    let (width, height) = pixel.output_size();
    if width == 0 || height == 0 || !pixel.x.is_finite() || !pixel.y.is_finite() {
        return Err(ValidationError::EmptyRegion);
    }
    Ok(pixel)
}
