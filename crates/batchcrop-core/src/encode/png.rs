//! PNG encoding for cropped output.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// First eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Errors that can occur while producing an output raster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded image to PNG bytes.
pub fn encode_image(image: &DecodedImage) -> Result<Vec<u8>, EncodeError> {
    encode_png(&image.pixels, image.width, image.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    #[test]
    fn test_encode_png_basic() {
        let pixels = vec![128u8; 100 * 100 * 4];
        let png = encode_png(&pixels, 100, 100).unwrap();

        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..(7 * 5 * 4)).map(|i| (i * 7 % 256) as u8).collect();
        let png = encode_png(&pixels, 7, 5).unwrap();

        let decoded = decode_image(&png, false).unwrap();
        assert_eq!(decoded.width, 7);
        assert_eq!(decoded.height, 5);
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn test_encode_png_is_deterministic() {
        let pixels: Vec<u8> = (0..(16 * 16 * 4)).map(|i| (i % 251) as u8).collect();
        let first = encode_png(&pixels, 16, 16).unwrap();
        let second = encode_png(&pixels, 16, 16).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_png_invalid_pixel_data_short() {
        let pixels = vec![128u8; 99 * 100 * 4]; // One row short

        let result = encode_png(&pixels, 100, 100);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_png_rgb_buffer_rejected() {
        // An RGB buffer is too short for RGBA
        let pixels = vec![128u8; 10 * 10 * 3];

        let result = encode_png(&pixels, 10, 10);
        assert_eq!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 300
            })
        );
    }

    #[test]
    fn test_encode_png_zero_width() {
        let result = encode_png(&[], 0, 100);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_zero_height() {
        let result = encode_png(&[], 100, 0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_image() {
        let img = DecodedImage::new(3, 2, vec![255u8; 3 * 2 * 4]);
        let png = encode_image(&img).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=32, 1u32..=32)
    }

    proptest! {
        /// Property: Valid input always encodes to a PNG.
        #[test]
        fn prop_valid_input_produces_png(
            (width, height) in dimensions_strategy(),
            fill in any::<u8>(),
        ) {
            let pixels = vec![fill; (width * height * 4) as usize];
            let png = encode_png(&pixels, width, height).unwrap();
            prop_assert_eq!(&png[0..8], &PNG_SIGNATURE[..]);
        }

        /// Property: Mismatched buffer lengths are rejected.
        #[test]
        fn prop_wrong_length_rejected(
            (width, height) in dimensions_strategy(),
            delta in 1usize..=16,
        ) {
            let len = (width * height * 4) as usize + delta;
            let result = encode_png(&vec![0u8; len], width, height);
            let is_invalid_pixel_data = matches!(result, Err(EncodeError::InvalidPixelData { .. }));
            prop_assert!(is_invalid_pixel_data);
        }
    }
}
