//! Device-facing capability providers for faultline.
//!
//! This crate provides the concrete capabilities a defect report can be
//! enriched with: a camera source backed by image files, location sources
//! (GeoIP lookup or a fixed site), and the consent prompt that stands in
//! for a platform permission dialog.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod camera;
pub mod consent;
pub mod location;

pub use camera::{CameraError, CapturedImage, FileCamera};
pub use consent::{ConsentDecision, ConsentError, ConsentPolicy};
pub use location::{Coordinates, FixedLocation, GeoIpLocation, LocationError};
