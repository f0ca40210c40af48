//! Device provider seams.
//!
//! The workflow talks to the platform through two small traits: one for
//! the location capability and one for the camera. Each pairs a
//! permission request with a single-shot capture. Implementations live
//! in the `faultline-device` crate; tests substitute in-memory doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::defect::{Photo, Position};

/// Errors that can occur inside a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The capability is not available (no hardware, no backend, no network).
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The capture itself failed after permission was granted.
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a capture failure.
    #[must_use]
    pub fn capture_failed(message: impl Into<String>) -> Self {
        Self::CaptureFailed(message.into())
    }
}

/// The outcome of a runtime permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    /// The user granted access.
    Granted,
    /// The user denied access.
    Denied,
}

impl Consent {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A source of the device's current coordinates.
///
/// Permission is requested before every capture; the workflow never
/// caches a previous answer.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The name of this provider (for logging).
    fn name(&self) -> &'static str;

    /// Ask the user for access to the location capability.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself cannot be made.
    async fn request_permission(&self) -> Result<Consent>;

    /// Take one coordinate sample.
    ///
    /// # Errors
    ///
    /// Returns an error if no position can be determined.
    async fn current_position(&self) -> Result<Position>;
}

/// A source of captured photos.
#[async_trait]
pub trait CameraProvider: Send + Sync {
    /// The name of this provider (for logging).
    fn name(&self) -> &'static str;

    /// Ask the user for access to the camera capability.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself cannot be made.
    async fn request_permission(&self) -> Result<Consent>;

    /// Capture one photo. `Ok(None)` means the user backed out, which
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture fails.
    async fn capture(&self) -> Result<Option<Photo>>;
}

/// A location provider for setups with no location capability wired in.
/// Always denies permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    fn name(&self) -> &'static str {
        "no-location"
    }

    async fn request_permission(&self) -> Result<Consent> {
        Ok(Consent::Denied)
    }

    async fn current_position(&self) -> Result<Position> {
        Err(ProviderError::unavailable("no location provider configured"))
    }
}

/// A camera provider for setups with no camera capability wired in.
/// Always denies permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

#[async_trait]
impl CameraProvider for NoCamera {
    fn name(&self) -> &'static str {
        "no-camera"
    }

    async fn request_permission(&self) -> Result<Consent> {
        Ok(Consent::Denied)
    }

    async fn capture(&self) -> Result<Option<Photo>> {
        Err(ProviderError::unavailable("no camera provider configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_is_granted() {
        assert!(Consent::Granted.is_granted());
        assert!(!Consent::Denied.is_granted());
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::unavailable("no GPS").to_string(),
            "provider unavailable: no GPS"
        );
        assert_eq!(
            ProviderError::capture_failed("shutter jammed").to_string(),
            "capture failed: shutter jammed"
        );
    }

    #[test]
    fn test_provider_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ProviderError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[tokio::test]
    async fn test_no_location_denies() {
        let provider = NoLocation;
        assert_eq!(provider.request_permission().await.unwrap(), Consent::Denied);
        assert!(provider.current_position().await.is_err());
    }

    #[tokio::test]
    async fn test_no_camera_denies() {
        let provider = NoCamera;
        assert_eq!(provider.request_permission().await.unwrap(), Consent::Denied);
        assert!(provider.capture().await.is_err());
    }
}
