//! Core defect record types for faultline.
//!
//! This module defines the data structures for a single defect report:
//! the record itself, the embedded photo payload, and the coordinate
//! pair produced by the location provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A geographic coordinate pair sampled from the location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Position {
    /// Renders the pair the way it is written into the location field:
    /// five decimal places, comma-space separated.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A photo attached to a defect report.
///
/// Always a self-contained `data:` URI so the record can travel as a
/// single JSON document with no external file references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(String);

impl Photo {
    /// Encode raw image bytes into a data URI payload.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;

        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    /// Wrap an existing data URI string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a `data:` URI.
    pub fn from_uri(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if uri.starts_with("data:") {
            Ok(Self(uri))
        } else {
            Err(Error::invalid_photo("expected a data: URI"))
        }
    }

    /// The full data URI, ready for embedding.
    #[must_use]
    pub fn as_uri(&self) -> &str {
        &self.0
    }

    /// Length of the encoded payload in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }
}

/// A single defect report.
///
/// Constructed client-side as a draft (no `id`, no `created_at`), sent
/// once, and replaced by the server-confirmed copy on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    /// Server-assigned identifier; absent until the record is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Short summary of the problem. Required.
    pub title: String,

    /// Free-form description. May be empty.
    #[serde(default)]
    pub description: String,

    /// Where the equipment is, typed by hand or derived from coordinates.
    pub location: String,

    /// The reporting laboratory or department. Required.
    pub lab: String,

    /// Optional embedded photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,

    /// Latitude, present only when the location provider was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude, present only when the location provider was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Server-assigned creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Defect {
    /// Build an unsent draft from form values.
    ///
    /// Taking the coordinates as one optional [`Position`] keeps the
    /// latitude/longitude fields both-present or both-absent.
    #[must_use]
    pub fn draft(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        lab: impl Into<String>,
        photo: Option<Photo>,
        position: Option<Position>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            location: location.into(),
            lab: lab.into(),
            photo,
            latitude: position.map(|p| p.latitude),
            longitude: position.map(|p| p.longitude),
            created_at: None,
        }
    }

    /// Whether the server has confirmed this record.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The coordinate pair, if both halves are present.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display_fixed_precision() {
        let position = Position::new(-23.55052, -46.633308);
        assert_eq!(position.to_string(), "-23.55052, -46.63331");
    }

    #[test]
    fn test_position_display_pads_short_fractions() {
        let position = Position::new(1.5, -2.0);
        assert_eq!(position.to_string(), "1.50000, -2.00000");
    }

    #[test]
    fn test_photo_from_bytes_is_data_uri() {
        let photo = Photo::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF]);
        assert!(photo.as_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_photo_from_uri_accepts_data_uri() {
        let photo = Photo::from_uri("data:image/png;base64,AAAA").unwrap();
        assert_eq!(photo.as_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_photo_from_uri_rejects_file_path() {
        let result = Photo::from_uri("/tmp/broken-pump.jpg");
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_has_no_server_fields() {
        let draft = Defect::draft("Broken pump", "", "Room 12", "Chemistry", None, None);
        assert!(draft.id.is_none());
        assert!(draft.created_at.is_none());
        assert!(!draft.is_persisted());
    }

    #[test]
    fn test_draft_coordinates_come_as_a_pair() {
        let draft = Defect::draft(
            "Broken pump",
            "",
            "Room 12",
            "Chemistry",
            None,
            Some(Position::new(-23.55052, -46.633308)),
        );
        assert_eq!(draft.latitude, Some(-23.55052));
        assert_eq!(draft.longitude, Some(-46.633308));
        assert!(draft.position().is_some());
    }

    #[test]
    fn test_position_absent_when_either_half_missing() {
        let mut defect = Defect::draft("t", "", "l", "lab", None, Some(Position::new(1.0, 2.0)));
        defect.longitude = None;
        assert!(defect.position().is_none());
    }

    #[test]
    fn test_draft_serialization_skips_absent_fields() {
        let draft = Defect::draft("Broken pump", "Leaks oil", "Room 12", "Chemistry", None, None);
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["title"], "Broken pump");
        assert_eq!(json["lab"], "Chemistry");
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("photo").is_none());
        assert!(json.get("latitude").is_none());
    }

    #[test]
    fn test_server_record_deserialization() {
        let json = r#"{
            "id": "6650f0c2",
            "title": "Broken pump",
            "location": "Room 12",
            "lab": "Chemistry",
            "photo": "data:image/jpeg;base64,AAAA",
            "latitude": -23.55052,
            "longitude": -46.633308,
            "createdAt": "2024-03-01T12:30:00Z"
        }"#;

        let defect: Defect = serde_json::from_str(json).unwrap();
        assert!(defect.is_persisted());
        assert_eq!(defect.description, "");
        assert!(defect.created_at.is_some());
        assert_eq!(
            defect.photo.as_ref().map(Photo::as_uri),
            Some("data:image/jpeg;base64,AAAA")
        );
    }

    #[test]
    fn test_round_trip_keeps_created_at_camel_case() {
        let mut defect = Defect::draft("t", "d", "l", "lab", None, None);
        defect.id = Some("42".to_string());
        defect.created_at = Some(Utc::now());

        let json = serde_json::to_string(&defect).unwrap();
        assert!(json.contains("createdAt"));

        let back: Defect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, defect);
    }
}
