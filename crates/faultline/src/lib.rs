//! `faultline` - client-side core for reporting equipment defects
//!
//! This library owns the defect submission workflow: form state, the
//! in-memory report history, validation, and the orchestration of the
//! location/camera providers and the remote defect API.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod defect;
pub mod device;
pub mod error;
pub mod logging;
pub mod provider;
pub mod workflow;

pub use api::{DefectApi, HttpApi};
pub use config::Config;
pub use defect::{Defect, Photo, Position};
pub use error::{Error, Result};
pub use logging::{init_logging, Verbosity};
pub use provider::{CameraProvider, Consent, LocationProvider, ProviderError};
pub use workflow::{
    FormField, HistoryOutcome, LocationOutcome, PhotoOutcome, ReportForm, SubmitOutcome, Workflow,
    WorkflowState,
};
