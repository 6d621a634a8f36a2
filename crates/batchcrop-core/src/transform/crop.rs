//! Cutting a pixel-space rectangle out of an image.
//!
//! The output follows the rules of drawing a source rectangle onto a fresh
//! canvas of the rectangle's size:
//!
//! - The output is `floor(width) x floor(height)` pixels
//! - The source origin is snapped to the nearest whole pixel
//! - Output pixels that fall outside the source stay fully transparent
//!
//! # Example
//!
//! ```ignore
//! // Cut a 200x160 block starting at (100, 80)
//! let region = PixelCropRegion { x: 100.0, y: 80.0, width: 200.0, height: 160.0 };
//! let cropped = crop_region(&image, &region)?;
//! ```

use crate::decode::DecodedImage;
use crate::encode::EncodeError;
use crate::region::PixelCropRegion;

const CHANNELS: usize = 4;

/// Crop `region` out of `image`.
///
/// # Errors
///
/// `EncodeError::InvalidDimensions` if the region has no whole pixel in
/// either direction, or if the output buffer size does not fit in `usize`.
pub fn crop_region(
    image: &DecodedImage,
    region: &PixelCropRegion,
) -> Result<DecodedImage, EncodeError> {
    let (out_width, out_height) = region.output_size();
    if out_width == 0 || out_height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: out_width,
            height: out_height,
        });
    }

    let origin_x = region.x.round() as i64;
    let origin_y = region.y.round() as i64;

    // Fast path: the region is the whole image
    if origin_x == 0 && origin_y == 0 && out_width == image.width && out_height == image.height {
        return Ok(image.clone());
    }

    let len = (out_width as usize)
        .checked_mul(out_height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(EncodeError::InvalidDimensions {
            width: out_width,
            height: out_height,
        })?;
    let mut output = vec![0u8; len];

    // Columns of the output that map inside the source
    let col_start = (-origin_x).clamp(0, out_width as i64);
    let col_end = (image.width as i64 - origin_x).clamp(0, out_width as i64);
    if col_start >= col_end {
        return Ok(DecodedImage::new(out_width, out_height, output));
    }
    let span = (col_end - col_start) as usize * CHANNELS;

    // Copy pixel data row by row
    for y in 0..out_height as i64 {
        let src_y = origin_y + y;
        if src_y < 0 || src_y >= image.height as i64 {
            continue;
        }

        let src_start = ((src_y * image.width as i64 + origin_x + col_start) as usize) * CHANNELS;
        let dst_start = ((y * out_width as i64 + col_start) as usize) * CHANNELS;

        output[dst_start..dst_start + span].copy_from_slice(&image.pixels[src_start..src_start + span]);
    }

    Ok(DecodedImage::new(out_width, out_height, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gradient_image, pixel_at};

    fn region(x: f64, y: f64, width: f64, height: f64) -> PixelCropRegion {
        PixelCropRegion {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_full_crop() {
        let img = gradient_image(100, 100);
        let result = crop_region(&img, &region(0.0, 0.0, 100.0, 100.0)).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = gradient_image(10, 10);
        let result = crop_region(&img, &region(2.0, 3.0, 6.0, 4.0)).unwrap();

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 4);
        // First pixel comes from (2, 3) in the original
        assert_eq!(pixel_at(&result, 0, 0), [2, 3, 0, 255]);
        assert_eq!(pixel_at(&result, 5, 3), [7, 6, 0, 255]);
    }

    #[test]
    fn test_scenario_region() {
        let img = gradient_image(1000, 800);
        let result = crop_region(&img, &region(100.0, 80.0, 200.0, 160.0)).unwrap();

        assert_eq!((result.width, result.height), (200, 160));
        assert_eq!(pixel_at(&result, 0, 0), [100, 80, 0, 255]);
        assert_eq!(pixel_at(&result, 199, 159), [(299 % 256) as u8, 239, 0, 255]);
    }

    #[test]
    fn test_fractional_size_truncates() {
        let img = gradient_image(20, 20);
        let result = crop_region(&img, &region(0.0, 0.0, 5.9, 3.2)).unwrap();
        assert_eq!((result.width, result.height), (5, 3));
    }

    #[test]
    fn test_fractional_origin_rounds() {
        let img = gradient_image(20, 20);
        let result = crop_region(&img, &region(2.6, 4.4, 3.0, 3.0)).unwrap();
        assert_eq!(pixel_at(&result, 0, 0), [3, 4, 0, 255]);
    }

    #[test]
    fn test_out_of_bounds_is_transparent() {
        let img = gradient_image(10, 10);
        let result = crop_region(&img, &region(8.0, 8.0, 4.0, 4.0)).unwrap();

        assert_eq!((result.width, result.height), (4, 4));
        assert_eq!(pixel_at(&result, 0, 0), [8, 8, 0, 255]);
        assert_eq!(pixel_at(&result, 1, 1), [9, 9, 0, 255]);
        assert_eq!(pixel_at(&result, 2, 0), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&result, 0, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_negative_origin_is_transparent() {
        let img = gradient_image(10, 10);
        let result = crop_region(&img, &region(-2.0, -1.0, 4.0, 3.0)).unwrap();

        assert_eq!(pixel_at(&result, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&result, 1, 0), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&result, 2, 1), [0, 0, 0, 255]);
        assert_eq!(pixel_at(&result, 3, 2), [1, 1, 0, 255]);
    }

    #[test]
    fn test_region_entirely_outside() {
        let img = gradient_image(10, 10);
        let result = crop_region(&img, &region(50.0, 50.0, 5.0, 5.0)).unwrap();

        assert_eq!((result.width, result.height), (5, 5));
        assert!(result.pixels.iter().all(|&v| v == 0));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_buffer_rejected() {
        let img = gradient_image(10, 10);
        // 4e9 * 4e9 * 4 bytes does not fit in a 64-bit usize
        let result = crop_region(&img, &region(0.0, 0.0, 4.0e9, 4.0e9));
        assert_eq!(
            result,
            Err(EncodeError::InvalidDimensions {
                width: 4_000_000_000,
                height: 4_000_000_000
            })
        );
    }

    #[test]
    fn test_empty_region_rejected() {
        let img = gradient_image(10, 10);
        let result = crop_region(&img, &region(1.0, 1.0, 0.5, 4.0));
        assert_eq!(
            result,
            Err(EncodeError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
