//! Location sources.
//!
//! Two ways to answer "where is this device": a single-shot GeoIP lookup
//! against a configurable JSON endpoint, and a fixed coordinate pair for
//! installations at a known site. Both take exactly one sample per call;
//! neither retries.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors related to position lookups.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The lookup request failed (connect, DNS, timeout).
    #[error("position request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered but carried no usable position.
    #[error("position lookup failed: {message}")]
    Lookup {
        /// What the endpoint reported.
        message: String,
    },
}

/// Result type for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;

impl LocationError {
    fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }
}

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// The shape of a GeoIP answer, following the common `ip-api` format.
#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl GeoIpResponse {
    fn into_coordinates(self) -> Result<Coordinates> {
        if let Some(status) = &self.status {
            if status != "success" {
                let message = self
                    .message
                    .unwrap_or_else(|| format!("lookup status {status}"));
                return Err(LocationError::lookup(message));
            }
        }

        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationError::lookup("response carried no coordinates")),
        }
    }
}

/// A location source backed by a GeoIP JSON endpoint.
#[derive(Debug, Clone)]
pub struct GeoIpLocation {
    client: reqwest::Client,
    url: String,
}

impl GeoIpLocation {
    /// Create a source against the given endpoint with a bounded timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Take one position sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the endpoint reports no
    /// usable position.
    pub async fn locate(&self) -> Result<Coordinates> {
        debug!(url = %self.url, "looking up position");
        let response: GeoIpResponse = self.client.get(&self.url).send().await?.json().await?;
        response.into_coordinates()
    }
}

/// A location source fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    /// A source that always reports the given pair.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
        }
    }

    /// Take one position sample.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches [`GeoIpLocation::locate`].
    pub async fn locate(&self) -> Result<Coordinates> {
        Ok(self.coordinates)
    }
}
