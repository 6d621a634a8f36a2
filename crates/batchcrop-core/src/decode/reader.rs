//! Image decoding with EXIF orientation handling.
//!
//! Any format enabled on the `image` dependency is accepted; the format is
//! sniffed from the bytes rather than trusted from the file name or MIME type.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Dimensions, Orientation};

/// Decode an image from bytes into RGBA pixels.
///
/// When `apply_orientation` is set the EXIF orientation is applied, so the
/// result matches what a browser renders for the same file.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized format.
/// Returns `DecodeError::CorruptedFile` if the data cannot be decoded.
pub fn decode_image(bytes: &[u8], apply_orientation: bool) -> Result<DecodedImage, DecodeError> {
    let img = open_reader(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if apply_orientation {
        orient(img, read_orientation(bytes))
    } else {
        img
    };

    Ok(DecodedImage::from_rgba_image(img.into_rgba8()))
}

/// Read the natural size of an image without decoding its pixels.
///
/// With `apply_orientation`, width and height are swapped for orientations
/// that rotate the image by 90 or 270 degrees.
pub fn probe_dimensions(bytes: &[u8], apply_orientation: bool) -> Result<Dimensions, DecodeError> {
    let (width, height) = open_reader(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let dims = Dimensions::new(width, height);
    if apply_orientation {
        Ok(dims.oriented(read_orientation(bytes)))
    } else {
        Ok(dims)
    }
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn open_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

/// Apply EXIF orientation transformation to an image.
fn orient(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
