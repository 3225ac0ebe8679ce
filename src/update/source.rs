//! Where the latest published version comes from.

use async_trait::async_trait;

use crate::update::UpdateError;
use crate::update::settings::UpdateSettings;

/// Remote source of the latest version and its release notes.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// What: Fetch the latest version string, trimmed.
    ///
    /// # Errors
    /// - HTTP, timeout or connection failures, non-200 status, empty body
    async fn latest_version(&self) -> Result<String, UpdateError>;

    /// What: Fetch release notes for a published version.
    ///
    /// Output:
    /// - `Ok(None)` when the release has no page
    ///
    /// # Errors
    /// - Transport or decoding failures
    async fn release_notes(&self, version: &str) -> Result<Option<String>, UpdateError>;
}

/// [`VersionSource`] over HTTP: a raw version file plus the GitHub releases API.
#[derive(Debug, Clone)]
pub struct HttpVersionSource {
    client: reqwest::Client,
    version_url: String,
    api_url: String,
    timeout_secs: u64,
}

impl HttpVersionSource {
    /// What: Build the HTTP client for the given settings.
    ///
    /// # Errors
    /// - Returns `UpdateError::Client` when the client cannot be constructed
    pub fn new(settings: &UpdateSettings) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("lingocache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpdateError::Client)?;
        Ok(Self {
            client,
            version_url: settings.version_url.clone(),
            api_url: settings.api_url.clone(),
            timeout_secs: settings.timeout_secs,
        })
    }

    fn classify(&self, err: reqwest::Error) -> UpdateError {
        if err.is_timeout() {
            UpdateError::Timeout {
                secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            UpdateError::Connect
        } else {
            UpdateError::Http(err)
        }
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    async fn latest_version(&self) -> Result<String, UpdateError> {
        let resp = self
            .client
            .get(&self.version_url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpdateError::Status(status.as_u16()));
        }
        let text = resp.text().await.map_err(|e| self.classify(e))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(UpdateError::Empty);
        }
        Ok(text.to_string())
    }

    async fn release_notes(&self, version: &str) -> Result<Option<String>, UpdateError> {
        let url = format!("{}/releases/tags/v{version}", self.api_url);
        tracing::debug!(url = %url, "fetching release notes");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        if !resp.status().is_success() {
            tracing::debug!(status = resp.status().as_u16(), "release notes not found");
            return Ok(None);
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| self.classify(e))?;
        Ok(Some(
            body.get("body")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("No release notes available.")
                .to_string(),
        ))
    }
}
