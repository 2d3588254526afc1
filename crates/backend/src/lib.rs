//! Workflow monitor backend adapter.
//!
//! Implements the [`relay::StatusNotifier`] trait with a `reqwest` client.
//! The [`relay`] crate has already built the URL, headers and body; this
//! crate only puts them on the wire and reports the status code back.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** No relay rules live here. In particular the client
//! does not retry, does not apply a request timeout, and does not decide
//! which status codes count as success.

use async_trait::async_trait;
use relay::{NotifyError, StatusNotifier, StatusRequest};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;

/// Errors raised while setting up the backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Posts status updates to the pipeline manager over HTTPS.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
}

impl BackendClient {
    /// Builds a client with the crate's default HTTP settings.
    pub fn new() -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("workflow-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl StatusNotifier for BackendClient {
    async fn post_status(&self, request: &StatusRequest) -> Result<u16, NotifyError> {
        tracing::debug!(url = %request.url, "Posting status update");

        let response = self
            .http
            .post(&request.url)
            .header(CONTENT_TYPE, request.content_type)
            .header(AUTHORIZATION, &request.authorization)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| NotifyError {
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!(url = %request.url, status = status.as_u16(), "Backend responded");
        Ok(status.as_u16())
    }
}
