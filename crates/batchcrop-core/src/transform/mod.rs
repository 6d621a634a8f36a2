//! Pixel transforms applied to each decoded source image.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in native pixels of the image being cropped
//! - Origin is the top-left corner
//! - Rectangles may extend past the image; uncovered pixels are transparent

mod crop;

pub use crop::crop_region;
