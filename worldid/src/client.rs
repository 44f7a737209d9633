//! Shared HTTP plumbing for the World ID developer API.

use crate::error::WorldIdError;

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

/// Production developer portal.
pub const DEFAULT_BASE_URL: &str = "https://developer.worldcoin.org";

/// Default timeout for World ID requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client bound to one World ID API base URL.
#[derive(Clone, Debug)]
pub struct WorldIdClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
}

impl WorldIdClient {
    /// Create a client with default timeout settings.
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .user_agent(concat!("petition-worldid/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and return the status with the raw response text.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<(StatusCode, String), WorldIdError> {
        let mut request = self.http_client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(WorldIdError::from_send)?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            WorldIdError::InvalidResponse {
                detail: format!("failed to read response body: {e}"),
                raw: String::new(),
            }
        })?;
        tracing::debug!(%url, status = status.as_u16(), "World ID response");
        Ok((status, text))
    }
}

impl Default for WorldIdClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
