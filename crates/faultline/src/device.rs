//! Adapters from the device crate onto the provider seams.
//!
//! `faultline-device` knows nothing about this crate; the types here wrap
//! its camera and location sources behind [`CameraProvider`] and
//! [`LocationProvider`] and translate its errors and consent decisions
//! into the workflow's vocabulary.

use std::time::Duration;

use async_trait::async_trait;

pub use faultline_device::{ConsentPolicy, FileCamera};
use faultline_device::{
    CameraError, ConsentDecision, ConsentError, FixedLocation, GeoIpLocation, LocationError,
};

use crate::defect::{Photo, Position};
use crate::provider::{
    CameraProvider, Consent, LocationProvider, ProviderError, Result as ProviderResult,
};

impl From<ConsentError> for ProviderError {
    fn from(err: ConsentError) -> Self {
        match err {
            ConsentError::Io(io) => Self::Io(io),
        }
    }
}

impl From<CameraError> for ProviderError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::UnsupportedFormat(path) => {
                Self::CaptureFailed(format!("unsupported image format: {path}"))
            }
            CameraError::Io(io) => Self::Io(io),
        }
    }
}

impl From<LocationError> for ProviderError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Request(request) => Self::Unavailable(request.to_string()),
            LocationError::Lookup { message } => Self::CaptureFailed(message),
        }
    }
}

fn consent(decision: ConsentDecision) -> Consent {
    if decision.is_granted() {
        Consent::Granted
    } else {
        Consent::Denied
    }
}

/// A camera provider over a [`FileCamera`], gated on a consent policy.
#[derive(Debug)]
pub struct DeviceCamera {
    camera: FileCamera,
    policy: ConsentPolicy,
}

impl DeviceCamera {
    /// Wrap a camera behind the given consent policy.
    #[must_use]
    pub fn new(camera: FileCamera, policy: ConsentPolicy) -> Self {
        Self { camera, policy }
    }
}

#[async_trait]
impl CameraProvider for DeviceCamera {
    fn name(&self) -> &'static str {
        "file-camera"
    }

    async fn request_permission(&self) -> ProviderResult<Consent> {
        Ok(consent(self.policy.decide("the camera").await?))
    }

    async fn capture(&self) -> ProviderResult<Option<Photo>> {
        match self.camera.capture().await? {
            Some(image) => Ok(Some(Photo::from_bytes(&image.mime, &image.bytes))),
            None => Ok(None),
        }
    }
}

#[derive(Debug)]
enum LocationSource {
    Fixed(FixedLocation),
    GeoIp(GeoIpLocation),
}

/// A location provider over one of the device location sources, gated on
/// a consent policy.
#[derive(Debug)]
pub struct DeviceLocation {
    source: LocationSource,
    policy: ConsentPolicy,
}

impl DeviceLocation {
    /// A provider reporting a pair fixed at construction.
    #[must_use]
    pub fn fixed(latitude: f64, longitude: f64, policy: ConsentPolicy) -> Self {
        Self {
            source: LocationSource::Fixed(FixedLocation::new(latitude, longitude)),
            policy,
        }
    }

    /// A provider backed by a GeoIP lookup endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup client cannot be built.
    pub fn geoip(
        url: impl Into<String>,
        timeout: Duration,
        policy: ConsentPolicy,
    ) -> ProviderResult<Self> {
        let source = GeoIpLocation::new(url, timeout)?;
        Ok(Self {
            source: LocationSource::GeoIp(source),
            policy,
        })
    }
}

#[async_trait]
impl LocationProvider for DeviceLocation {
    fn name(&self) -> &'static str {
        match self.source {
            LocationSource::Fixed(_) => "fixed-location",
            LocationSource::GeoIp(_) => "geoip-location",
        }
    }

    async fn request_permission(&self) -> ProviderResult<Consent> {
        Ok(consent(self.policy.decide("the device location").await?))
    }

    async fn current_position(&self) -> ProviderResult<Position> {
        let coordinates = match &self.source {
            LocationSource::Fixed(source) => source.locate().await?,
            LocationSource::GeoIp(source) => source.locate().await?,
        };
        Ok(Position::new(coordinates.latitude, coordinates.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_camera_adapter_follows_policy() {
        let camera = DeviceCamera::new(FileCamera::unattached(), ConsentPolicy::AlwaysDeny);
        assert_eq!(camera.request_permission().await.unwrap(), Consent::Denied);

        let camera = DeviceCamera::new(FileCamera::unattached(), ConsentPolicy::AlwaysGrant);
        assert_eq!(camera.request_permission().await.unwrap(), Consent::Granted);
    }

    #[tokio::test]
    async fn test_unattached_camera_reports_cancellation() {
        let camera = DeviceCamera::new(FileCamera::unattached(), ConsentPolicy::AlwaysGrant);
        assert_eq!(camera.capture().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_camera_adapter_encodes_capture() {
        let path = std::env::temp_dir().join("faultline-device-adapter-test.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let camera = DeviceCamera::new(FileCamera::new(&path), ConsentPolicy::AlwaysGrant);
        let photo = camera.capture().await.unwrap().unwrap();
        assert!(photo.as_uri().starts_with("data:image/jpeg;base64,"));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_fixed_location_adapter_samples_its_pair() {
        let location = DeviceLocation::fixed(-23.55052, -46.633308, ConsentPolicy::AlwaysGrant);
        assert_eq!(location.name(), "fixed-location");

        let position = location.current_position().await.unwrap();
        assert_eq!(position.to_string(), "-23.55052, -46.63331");
    }

    #[tokio::test]
    async fn test_geoip_location_adapter_builds() {
        let location = DeviceLocation::geoip(
            "http://ip-api.com/json",
            Duration::from_secs(10),
            ConsentPolicy::AlwaysDeny,
        )
        .unwrap();
        assert_eq!(location.name(), "geoip-location");
        assert_eq!(location.request_permission().await.unwrap(), Consent::Denied);
    }

    #[test]
    fn test_camera_error_maps_to_capture_failure() {
        let err: ProviderError = CameraError::UnsupportedFormat("notes.txt".to_string()).into();
        assert!(matches!(err, ProviderError::CaptureFailed(_)));
    }

    #[test]
    fn test_lookup_error_maps_to_capture_failure() {
        let err: ProviderError = LocationError::Lookup {
            message: "private range".to_string(),
        }
        .into();
        assert!(matches!(err, ProviderError::CaptureFailed(_)));
    }
}
