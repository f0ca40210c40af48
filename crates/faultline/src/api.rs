//! Remote defect API client.
//!
//! Wraps the backend's two endpoints (`GET /defeitos`, `POST /defeitos`)
//! behind the [`DefectApi`] trait using [`reqwest`]. The base address and
//! request timeout are fixed at construction; there are no retries.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::defect::Defect;
use crate::error::{Error, Result};

/// Wire path of the defect collection, fixed by the backend contract.
const DEFECTS_PATH: &str = "defeitos";

/// The remote API the workflow submits records to.
///
/// The workflow only depends on this trait; [`HttpApi`] is the real
/// implementation and tests provide in-memory doubles.
#[async_trait]
pub trait DefectApi: Send + Sync {
    /// Fetch every stored defect record, in server order (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn list_defects(&self) -> Result<Vec<Defect>>;

    /// Store a draft record. The returned copy carries the server-assigned
    /// `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn create_defect(&self, draft: &Defect) -> Result<Defect>;
}

/// HTTP client for a single defect backend.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client with a fixed base URL and request timeout.
    ///
    /// Requests running past the timeout fail as a network error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Ensure the response has a success status. Returns the response
    /// unchanged on success, or an [`Error::ApiStatus`] carrying the
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::api_status(status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl DefectApi for HttpApi {
    async fn list_defects(&self) -> Result<Vec<Defect>> {
        let url = self.endpoint(DEFECTS_PATH);
        debug!(%url, "fetching defect list");

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn create_defect(&self, draft: &Defect) -> Result<Defect> {
        let url = self.endpoint(DEFECTS_PATH);
        debug!(%url, title = %draft.title, "posting defect");

        let response = self.client.post(url).json(draft).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::with_client(reqwest::Client::new(), "http://127.0.0.1:3000/api/");
        assert_eq!(api.base_url(), "http://127.0.0.1:3000/api");
    }

    #[test]
    fn test_endpoint_joins_path() {
        let api = HttpApi::with_client(reqwest::Client::new(), "http://127.0.0.1:3000/api");
        assert_eq!(
            api.endpoint("defeitos"),
            "http://127.0.0.1:3000/api/defeitos"
        );
        assert_eq!(
            api.endpoint("/defeitos"),
            "http://127.0.0.1:3000/api/defeitos"
        );
    }

    #[test]
    fn test_new_builds_client() {
        let api = HttpApi::new("http://127.0.0.1:3000/api", Duration::from_secs(10));
        assert!(api.is_ok());
    }
}
