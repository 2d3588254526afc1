//! Relay dispatch: filter, validate, address, authenticate, deliver.
//!
//! The [`Dispatcher`] owns the immutable [`RelayConfig`] and a
//! [`StatusNotifier`] that performs the actual HTTP call. It never retries:
//! every failure is returned to the caller with its [`crate::Severity`], and
//! the caller decides whether the process survives.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::{filter_message, FilteredEvent, RelayConfig, RelayError, RunName};

/// `Content-Type` of every status update.
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ---------------------------------------------------------------------------
// Outbound port
// ---------------------------------------------------------------------------

/// A fully built status update, ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    /// Absolute destination URL.
    pub url: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// JSON-encoded [`FilteredEvent`].
    pub body: String,
}

/// Failure to obtain any HTTP response from the backend.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NotifyError {
    pub message: String,
}

/// Delivers status updates to the backend.
///
/// Implementations return the HTTP status code of the response. They must
/// not retry and must not interpret the status code.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn post_status(&self, request: &StatusRequest) -> Result<u16, NotifyError>;
}

#[async_trait]
impl<N: StatusNotifier + ?Sized> StatusNotifier for std::sync::Arc<N> {
    async fn post_status(&self, request: &StatusRequest) -> Result<u16, NotifyError> {
        (**self).post_status(request).await
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// What happened to an inbound event that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// The backend acknowledged the status update.
    Forwarded { run_name: RunName },
    /// The event is not tracked by the backend; nothing was sent.
    Dropped,
}

pub struct Dispatcher<N> {
    config: RelayConfig,
    notifier: N,
}

impl<N: StatusNotifier> Dispatcher<N> {
    pub fn new(config: RelayConfig, notifier: N) -> Self {
        Self { config, notifier }
    }

    /// Relays one inbound event to the backend.
    ///
    /// The run name is validated before any request is built, so an invalid
    /// identifier never reaches the notifier. Only a `200` response counts
    /// as success.
    pub async fn dispatch(&self, message: &Value) -> Result<Dispatched, RelayError> {
        let Some(filtered) = filter_message(message)? else {
            return Ok(Dispatched::Dropped);
        };

        if !filtered.run_name.is_workflow_id() {
            return Err(RelayError::InvalidRunName {
                run_name: filtered.run_name.to_string(),
            });
        }

        let request = self.build_request(&filtered)?;
        let run_name = filtered.run_name;

        let status = self
            .notifier
            .post_status(&request)
            .await
            .map_err(|e| RelayError::BackendUnreachable {
                run_name: run_name.clone(),
                message: e.message,
            })?;

        match status {
            200 => {
                tracing::info!(run_name = %run_name, "Successfully notified backend");
                Ok(Dispatched::Forwarded { run_name })
            }
            status => Err(RelayError::BackendRejected { run_name, status }),
        }
    }

    fn build_request(&self, filtered: &FilteredEvent) -> Result<StatusRequest, RelayError> {
        Ok(StatusRequest {
            url: self.config.status_url(&filtered.run_name),
            authorization: self.config.token().basic_authorization(),
            content_type: CONTENT_TYPE_JSON,
            body: serde_json::to_string(filtered)?,
        })
    }
}
