//! Image decoding for the batch pipeline.
//!
//! Source files arrive as raw bytes from the page. Decoding applies EXIF
//! orientation by default so that pixel coordinates agree with the size the
//! browser reports for the rendered reference image.

mod reader;
mod types;

pub use reader::{decode_image, probe_dimensions, read_orientation};
pub use types::{DecodeError, DecodedImage, Dimensions, Orientation};
