//! Batch Crop Core - batch image cropping library
//!
//! This crate implements the pipeline behind the batch crop page: the user
//! uploads several images, draws one rectangle on the first of them, and gets
//! every image cropped to that rectangle as PNGs inside a zip archive.
//!
//! ```text
//! upload → selector → batch → archive
//! ```
//!
//! [`session::Session`] ties the stages together as a state machine. The
//! stages are also usable on their own.

pub mod archive;
pub mod batch;
pub mod decode;
pub mod encode;
pub mod error;
pub mod naming;
pub mod options;
pub mod region;
pub mod selector;
pub mod session;
pub mod transform;
pub mod upload;

pub use archive::{export, Archive, ArchiveError};
pub use batch::{BatchCropper, BatchInput, BatchOutcome, BatchReport, CroppedResult, ItemFailure};
pub use error::{Action, CropError, ValidationError};
pub use options::{BatchOptions, CollisionPolicy, DimensionPolicy, FailurePolicy};
pub use region::{to_pixel_region, CropRegion, CropUnit, DisplaySize, PixelCropRegion, ScaleFactors};
pub use selector::{default_region, CropSelector};
pub use session::{Session, SessionState};
pub use upload::{DisplayHandle, DisplayHandles, HandleError, LocalHandles, SourceImage, UploadFile};
