//! Error and severity types for the relay domain.
//!
//! [`RelayError`] covers every condition that stops a single dispatch. Each
//! variant carries a [`Severity`] so the top-level supervisor can decide
//! whether to keep serving or to terminate the process.

use thiserror::Error;

use crate::RunName;

/// Example of a well-formed workflow run identifier, quoted in diagnostics.
pub const RUN_NAME_EXAMPLE: &str = "INTP00000000408";

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How far an error must be escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Confined to the request that produced it. The listener answers the
    /// caller with an error status and keeps serving.
    Recoverable,
    /// Indicates a systemic upstream or backend problem. The request is never
    /// answered and the process terminates.
    Fatal,
}

// ---------------------------------------------------------------------------
// Relay errors
// ---------------------------------------------------------------------------

/// Errors produced while filtering or dispatching one inbound event.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound payload is valid JSON but lacks a required field, or a
    /// field has the wrong JSON type.
    #[error("Malformed event: {reason}")]
    MalformedEvent {
        /// Which field is missing or ill-typed.
        reason: String,
    },

    /// A forwardable event named a run that is not a workflow identifier.
    #[error(
        "Invalid workflow ID: {run_name}; workflow ID must be in the format: {example}",
        example = RUN_NAME_EXAMPLE
    )]
    InvalidRunName {
        /// The offending `runName` value.
        run_name: String,
    },

    /// The backend answered with anything other than `200 OK`.
    #[error("Backend notification failed for {run_name} with status {status}, bailing out")]
    BackendRejected {
        /// Run whose status update was rejected.
        run_name: RunName,
        /// HTTP status code returned by the backend.
        status: u16,
    },

    /// The backend could not be reached or did not produce a response.
    #[error("Backend notification failed for {run_name}: {message}")]
    BackendUnreachable {
        /// Run whose status update could not be delivered.
        run_name: RunName,
        /// Transport-level failure description.
        message: String,
    },

    /// The filtered event could not be serialised for the outbound request.
    #[error("Failed to encode status update: {0}")]
    Encode(#[from] serde_json::Error),

    /// The process configuration is unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl RelayError {
    /// Returns how far this error must be escalated.
    pub fn severity(&self) -> Severity {
        match self {
            RelayError::MalformedEvent { .. } => Severity::Recoverable,
            RelayError::InvalidRunName { .. }
            | RelayError::BackendRejected { .. }
            | RelayError::BackendUnreachable { .. }
            | RelayError::Encode(_)
            | RelayError::Configuration { .. } => Severity::Fatal,
        }
    }

    /// Returns `true` if this error must terminate the process.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        RelayError::MalformedEvent {
            reason: format!("missing required field '{field}'"),
        }
    }

    pub(crate) fn wrong_type(field: &str, expected: &str) -> Self {
        RelayError::MalformedEvent {
            reason: format!("field '{field}' must be a {expected}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_event_is_recoverable() {
        let err = RelayError::missing_field("event");
        assert_eq!(err.severity(), Severity::Recoverable);
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Malformed event: missing required field 'event'");
    }

    #[test]
    fn invalid_run_name_is_fatal_and_quotes_example() {
        let err = RelayError::InvalidRunName {
            run_name: "nf-run-42".to_string(),
        };
        assert!(err.is_fatal());
        let text = err.to_string();
        assert!(text.contains("nf-run-42"));
        assert!(text.contains(RUN_NAME_EXAMPLE));
    }

    #[test]
    fn backend_failures_are_fatal() {
        let run_name = RunName::new("INTP00000000408").unwrap();
        let rejected = RelayError::BackendRejected {
            run_name: run_name.clone(),
            status: 500,
        };
        let unreachable = RelayError::BackendUnreachable {
            run_name,
            message: "connection refused".to_string(),
        };
        assert!(rejected.is_fatal());
        assert!(unreachable.is_fatal());
        assert!(rejected.to_string().contains("bailing out"));
    }
}
