//! Consent handling for device capabilities.
//!
//! Access to the camera and location capabilities is gated on a consent
//! decision taken immediately before each use, mirroring a platform
//! runtime-permission dialog. The interactive policy asks on the
//! controlling terminal; the fixed policies exist for scripted use.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

/// Errors related to consent prompting.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// The prompt could not be shown or read.
    #[error("consent prompt failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for consent operations.
pub type Result<T> = std::result::Result<T, ConsentError>;

/// The user's answer to a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentDecision {
    /// Access was granted.
    Granted,
    /// Access was denied.
    Denied,
}

impl ConsentDecision {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// How consent requests are answered.
///
/// Every capability use asks again; a decision is never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentPolicy {
    /// Ask on the controlling terminal (y/N).
    #[default]
    Prompt,
    /// Grant every request without asking.
    AlwaysGrant,
    /// Deny every request without asking.
    AlwaysDeny,
}

impl ConsentPolicy {
    /// Decide whether access to the named capability is granted.
    ///
    /// # Errors
    ///
    /// Returns an error if the interactive prompt cannot be shown or read.
    pub async fn decide(self, capability: &str) -> Result<ConsentDecision> {
        match self {
            Self::AlwaysGrant => {
                debug!(capability, "consent granted by policy");
                Ok(ConsentDecision::Granted)
            }
            Self::AlwaysDeny => {
                debug!(capability, "consent denied by policy");
                Ok(ConsentDecision::Denied)
            }
            Self::Prompt => {
                let capability = capability.to_string();
                tokio::task::spawn_blocking(move || prompt(&capability))
                    .await
                    .map_err(|err| ConsentError::Io(io::Error::other(err)))?
            }
        }
    }
}

/// Ask on the terminal. Anything other than an explicit yes is a denial.
fn prompt(capability: &str) -> Result<ConsentDecision> {
    let mut stderr = io::stderr();
    write!(stderr, "Allow access to {capability}? [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(ConsentDecision::Granted),
        _ => Ok(ConsentDecision::Denied),
    }
}
