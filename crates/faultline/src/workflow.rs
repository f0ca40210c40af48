//! Defect submission workflow.
//!
//! [`Workflow`] is the single owner of the report form and the in-memory
//! history list. The rendering layer reads snapshots and mutates state
//! only through the operations defined here: loading history, enriching
//! the form through the location/camera providers, and submitting the
//! assembled record to the remote API.
//!
//! Operations take `&self` and may be invoked concurrently; the form and
//! history sit behind a mutex that is never held across an await point,
//! and a single atomic flag rejects overlapping submissions.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::api::DefectApi;
use crate::defect::{Defect, Photo, Position};
use crate::provider::{CameraProvider, Consent, LocationProvider, NoCamera, NoLocation};

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// The defect title.
    Title,
    /// The equipment location.
    Location,
    /// The reporting laboratory.
    Lab,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Location => write!(f, "location"),
            Self::Lab => write!(f, "lab"),
        }
    }
}

/// The editable report form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportForm {
    /// Short summary of the problem.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Where the equipment is.
    pub location: String,
    /// The reporting laboratory.
    pub lab: String,
    /// Attached photo, if any.
    pub photo: Option<Photo>,
    /// Raw coordinate pair, kept alongside the formatted location field.
    pub position: Option<Position>,
}

impl ReportForm {
    /// Required fields that are still empty (whitespace counts as empty).
    #[must_use]
    pub fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(FormField::Title);
        }
        if self.location.trim().is_empty() {
            missing.push(FormField::Location);
        }
        if self.lab.trim().is_empty() {
            missing.push(FormField::Lab);
        }
        missing
    }

    fn to_draft(&self) -> Defect {
        Defect::draft(
            self.title.clone(),
            self.description.clone(),
            self.location.clone(),
            self.lab.clone(),
            self.photo.clone(),
            self.position,
        )
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Observable workflow state, derived from the in-flight operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Editing; nothing in flight.
    Idle,
    /// A location request is in flight.
    LocationRequesting,
    /// A photo capture is in flight.
    PhotoCapturing,
    /// A submission is in flight.
    Submitting,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LocationRequesting => write!(f, "requesting location"),
            Self::PhotoCapturing => write!(f, "capturing photo"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

/// Outcome of [`Workflow::load_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// History was replaced with this many records.
    Loaded(usize),
    /// The backend could not be read; the current list is unchanged.
    /// Non-blocking: callers may show an indicator but must carry on.
    Unavailable,
}

/// Outcome of [`Workflow::request_location`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// A sample was taken and written into the location field.
    Updated(Position),
    /// The user denied location access; nothing changed.
    Denied,
    /// Permission was granted but no position could be read.
    Failed(String),
}

/// Outcome of [`Workflow::capture_photo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// A photo was captured and attached to the form.
    Attached,
    /// The user backed out of the capture; nothing changed.
    Cancelled,
    /// The user denied camera access; nothing changed.
    Denied,
    /// Permission was granted but the capture failed.
    Failed(String),
}

/// Outcome of [`Workflow::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The record was stored; the server's copy now heads the history.
    Saved(Defect),
    /// Required fields are empty; nothing was sent.
    MissingFields(Vec<FormField>),
    /// The request failed; every form field is preserved for retry.
    Rejected(String),
    /// Another submission is already in flight; this one was ignored.
    AlreadySubmitting,
}

#[derive(Debug, Default)]
struct Inner {
    form: ReportForm,
    history: Vec<Defect>,
}

/// The defect submission workflow controller.
pub struct Workflow {
    api: Arc<dyn DefectApi>,
    location: Arc<dyn LocationProvider>,
    camera: Arc<dyn CameraProvider>,
    inner: Mutex<Inner>,
    submitting: AtomicBool,
    locating: AtomicUsize,
    capturing: AtomicUsize,
}

impl Workflow {
    /// Create a workflow over the given API, with no device providers
    /// wired in. Location and camera requests will report denial until
    /// real providers are attached.
    #[must_use]
    pub fn new(api: Arc<dyn DefectApi>) -> Self {
        Self {
            api,
            location: Arc::new(NoLocation),
            camera: Arc::new(NoCamera),
            inner: Mutex::new(Inner::default()),
            submitting: AtomicBool::new(false),
            locating: AtomicUsize::new(0),
            capturing: AtomicUsize::new(0),
        }
    }

    /// Attach a location provider.
    #[must_use]
    pub fn with_location_provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = provider;
        self
    }

    /// Attach a camera provider.
    #[must_use]
    pub fn with_camera_provider(mut self, provider: Arc<dyn CameraProvider>) -> Self {
        self.camera = provider;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current observable state. A submission outranks the optional
    /// enrichment steps when several operations are in flight.
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        if self.submitting.load(Ordering::SeqCst) {
            WorkflowState::Submitting
        } else if self.locating.load(Ordering::SeqCst) > 0 {
            WorkflowState::LocationRequesting
        } else if self.capturing.load(Ordering::SeqCst) > 0 {
            WorkflowState::PhotoCapturing
        } else {
            WorkflowState::Idle
        }
    }

    /// Snapshot of the current form.
    #[must_use]
    pub fn form(&self) -> ReportForm {
        self.lock().form.clone()
    }

    /// Snapshot of the history list, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<Defect> {
        self.lock().history.clone()
    }

    /// Set the title field.
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().form.title = title.into();
    }

    /// Set the description field.
    pub fn set_description(&self, description: impl Into<String>) {
        self.lock().form.description = description.into();
    }

    /// Set the location field by hand. Manual edits drop any previously
    /// sampled coordinates, which no longer describe the typed text.
    pub fn set_location(&self, location: impl Into<String>) {
        let mut inner = self.lock();
        inner.form.location = location.into();
        inner.form.position = None;
    }

    /// Set the lab field.
    pub fn set_lab(&self, lab: impl Into<String>) {
        self.lock().form.lab = lab.into();
    }

    /// Attach a photo directly, bypassing the camera provider.
    pub fn attach_photo(&self, photo: Photo) {
        self.lock().form.photo = Some(photo);
    }

    /// Remove the attached photo, if any.
    pub fn clear_photo(&self) {
        self.lock().form.photo = None;
    }

    /// Fetch all stored records and replace the history list.
    ///
    /// A failure leaves the list untouched and is reported as
    /// [`HistoryOutcome::Unavailable`]; it is logged but never fatal.
    pub async fn load_history(&self) -> HistoryOutcome {
        match self.api.list_defects().await {
            Ok(defects) => {
                let count = defects.len();
                self.lock().history = defects;
                info!(count, "history loaded");
                HistoryOutcome::Loaded(count)
            }
            Err(error) => {
                warn!(%error, "history load failed; keeping current list");
                HistoryOutcome::Unavailable
            }
        }
    }

    /// Request permission and take one coordinate sample, writing the
    /// fixed-precision string into the location field on success.
    ///
    /// Concurrent calls are allowed to race; whichever sample completes
    /// last is the one that sticks. In-flight requests are not cancelled.
    pub async fn request_location(&self) -> LocationOutcome {
        self.locating.fetch_add(1, Ordering::SeqCst);
        let outcome = self.request_location_inner().await;
        self.locating.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn request_location_inner(&self) -> LocationOutcome {
        match self.location.request_permission().await {
            Ok(Consent::Granted) => {}
            Ok(Consent::Denied) => {
                info!(provider = self.location.name(), "location permission denied");
                return LocationOutcome::Denied;
            }
            Err(error) => {
                warn!(%error, provider = self.location.name(), "location permission request failed");
                return LocationOutcome::Failed(error.to_string());
            }
        }

        match self.location.current_position().await {
            Ok(position) => {
                let mut inner = self.lock();
                inner.form.location = position.to_string();
                inner.form.position = Some(position);
                debug!(%position, "location field updated");
                LocationOutcome::Updated(position)
            }
            Err(error) => {
                warn!(%error, provider = self.location.name(), "position read failed");
                LocationOutcome::Failed(error.to_string())
            }
        }
    }

    /// Request permission and capture one photo, attaching it to the
    /// form on success. Cancellation leaves the photo field untouched.
    pub async fn capture_photo(&self) -> PhotoOutcome {
        self.capturing.fetch_add(1, Ordering::SeqCst);
        let outcome = self.capture_photo_inner().await;
        self.capturing.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn capture_photo_inner(&self) -> PhotoOutcome {
        match self.camera.request_permission().await {
            Ok(Consent::Granted) => {}
            Ok(Consent::Denied) => {
                info!(provider = self.camera.name(), "camera permission denied");
                return PhotoOutcome::Denied;
            }
            Err(error) => {
                warn!(%error, provider = self.camera.name(), "camera permission request failed");
                return PhotoOutcome::Failed(error.to_string());
            }
        }

        match self.camera.capture().await {
            Ok(Some(photo)) => {
                self.lock().form.photo = Some(photo);
                PhotoOutcome::Attached
            }
            Ok(None) => {
                debug!("photo capture cancelled");
                PhotoOutcome::Cancelled
            }
            Err(error) => {
                warn!(%error, provider = self.camera.name(), "photo capture failed");
                PhotoOutcome::Failed(error.to_string())
            }
        }
    }

    /// Validate the form and send it to the backend.
    ///
    /// On success the server's record is prepended to the history and
    /// every form field is cleared. On failure the form is preserved
    /// exactly so the user can retry without re-entering anything.
    /// Overlapping calls are rejected instead of double-submitting.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("submit ignored; another submission is in flight");
            return SubmitOutcome::AlreadySubmitting;
        }

        let outcome = self.submit_inner().await;
        self.submitting.store(false, Ordering::SeqCst);
        outcome
    }

    async fn submit_inner(&self) -> SubmitOutcome {
        let draft = {
            let inner = self.lock();
            let missing = inner.form.missing_fields();
            if !missing.is_empty() {
                return SubmitOutcome::MissingFields(missing);
            }
            inner.form.to_draft()
        };

        match self.api.create_defect(&draft).await {
            Ok(saved) => {
                let mut inner = self.lock();
                inner.history.insert(0, saved.clone());
                inner.form.clear();
                info!(id = ?saved.id, "defect saved");
                SubmitOutcome::Saved(saved)
            }
            Err(error) => {
                warn!(%error, "submission failed; form retained");
                SubmitOutcome::Rejected(error.to_string())
            }
        }
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Workflow")
            .field("state", &self.state())
            .field("form", &inner.form)
            .field("history_len", &inner.history.len())
            .finish_non_exhaustive()
    }
}
