//! Lossless output encoding.
//!
//! Every cropped region is written as a PNG so the archive carries exactly
//! the pixels that were cut out of the source, alpha included.
//!
//! # Examples
//!
//! ```ignore
//! use batchcrop_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 100 * 100 * 4]; // Gray image
//! let png_bytes = encode_png(&pixels, 100, 100).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_image, encode_png, EncodeError, PNG_SIGNATURE};
