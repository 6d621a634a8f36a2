//! Upload collection and display handles.
//!
//! The page hands over every selected file as name, MIME type and bytes.
//! Files that are not images are dropped here; each accepted file gets a
//! display handle (an object URL in the browser) that must be released once
//! the file is discarded.

use thiserror::Error;

use crate::error::{CropError, ValidationError};

/// Failure to allocate a display handle.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to create display handle: {0}")]
pub struct HandleError(pub String);

/// Opaque, revocable reference used by the page to show an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle(String);

impl DisplayHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Allocates and releases display handles.
///
/// Implemented with object URLs in the browser; [`LocalHandles`] covers
/// native use and tests.
pub trait DisplayHandles {
    fn allocate(&mut self, bytes: &[u8], mime: &str) -> Result<DisplayHandle, HandleError>;

    fn release(&mut self, handle: &DisplayHandle);
}

/// In-process handle store that only tracks which handles are live.
#[derive(Debug, Default)]
pub struct LocalHandles {
    next_id: u64,
    live: Vec<DisplayHandle>,
}

impl LocalHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: &DisplayHandle) -> bool {
        self.live.contains(handle)
    }
}

impl DisplayHandles for LocalHandles {
    fn allocate(&mut self, _bytes: &[u8], _mime: &str) -> Result<DisplayHandle, HandleError> {
        self.next_id += 1;
        let handle = DisplayHandle::new(format!("local:{}", self.next_id));
        self.live.push(handle.clone());
        Ok(handle)
    }

    fn release(&mut self, handle: &DisplayHandle) {
        self.live.retain(|h| h != handle);
    }
}

/// One file as selected on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// An accepted upload together with its display handle.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub display_handle: DisplayHandle,
}

/// Accept the image files out of `files`, allocating one display handle per
/// file in input order.
///
/// # Errors
///
/// `ValidationError::NoImages` when nothing is left after filtering. If a
/// handle cannot be allocated, the handles already handed out are released
/// before the error is returned.
pub fn collect<H: DisplayHandles>(
    files: Vec<UploadFile>,
    handles: &mut H,
) -> Result<Vec<SourceImage>, CropError> {
    let mut sources: Vec<SourceImage> = Vec::with_capacity(files.len());

    for file in files {
        if !file.is_image() {
            log::warn!("skipping {}: {} is not an image type", file.name, file.mime);
            continue;
        }

        match handles.allocate(&file.bytes, &file.mime) {
            Ok(display_handle) => sources.push(SourceImage {
                name: file.name,
                mime: file.mime,
                bytes: file.bytes,
                display_handle,
            }),
            Err(e) => {
                release_all(handles, sources.iter().map(|s| &s.display_handle));
                return Err(e.into());
            }
        }
    }

    if sources.is_empty() {
        return Err(ValidationError::NoImages.into());
    }

    log::debug!("accepted {} image(s)", sources.len());
    Ok(sources)
}

/// Release every handle in `discarded`.
pub fn release_all<'a, H, I>(handles: &mut H, discarded: I)
where
    H: DisplayHandles + ?Sized,
    I: IntoIterator<Item = &'a DisplayHandle>,
{
    for handle in discarded {
        handles.release(handle);
    }
}
