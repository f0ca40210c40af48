//! File-backed camera source.
//!
//! A capture reads an image file chosen up front and hands back its raw
//! bytes with the MIME type derived from the file extension. A camera
//! constructed with no file reports cancellation instead, the same shape
//! a user backing out of a platform capture dialog produces.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors related to photo capture.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The file extension does not map to a supported image type.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image file could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for camera operations.
pub type Result<T> = std::result::Result<T, CameraError>;

/// One captured image: raw bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// MIME type, e.g. `image/jpeg`.
    pub mime: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A camera that captures by reading an image file.
#[derive(Debug, Clone, Default)]
pub struct FileCamera {
    path: Option<PathBuf>,
}

impl FileCamera {
    /// A camera that captures the given image file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A camera with no image attached. Captures report cancellation.
    #[must_use]
    pub fn unattached() -> Self {
        Self { path: None }
    }

    /// Capture one image. `Ok(None)` means there is nothing to capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a supported
    /// image type.
    pub async fn capture(&self) -> Result<Option<CapturedImage>> {
        let Some(path) = &self.path else {
            debug!("no image attached, reporting cancellation");
            return Ok(None);
        };

        let mime = mime_for_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        debug!(path = %path.display(), mime, len = bytes.len(), "image captured");

        Ok(Some(CapturedImage {
            mime: mime.to_string(),
            bytes,
        }))
    }
}

/// Map a file extension onto the MIME type the capture will carry.
fn mime_for_path(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(CameraError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}
