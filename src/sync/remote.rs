//! Remote sync adapter for the spreadsheet-backed cloud endpoint.
//!
//! The endpoint takes the whole document as a `text/plain` POST body (no
//! preflight on the script host) and returns the same JSON from a GET.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::errors::AppError;
use crate::models::Document;

/// HTTP client bound to one remote endpoint.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    url: String,
}

impl RemoteClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// GET the remote copy. Non-OK statuses and unparseable bodies are errors.
    pub async fn fetch(&self) -> Result<Document, AppError> {
        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let body = response.text().await?;

        serde_json::from_str(&body)
            .map_err(|e| AppError::Remote(format!("Malformed remote document: {}", e)))
    }

    /// POST an already serialized document.
    pub async fn push(&self, body: String) -> Result<(), AppError> {
        self.http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
