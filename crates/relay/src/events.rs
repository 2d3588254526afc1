//! Inbound lifecycle events and the message filter.
//!
//! The upstream pipeline engine emits one JSON object per lifecycle
//! transition, most of which the backend does not care about.
//! [`filter_message`] keeps only run starts, completions and errors, and
//! reshapes them into the flat [`FilteredEvent`] the backend expects.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{RelayError, RunName};

// Inbound field names, as emitted upstream.
const FIELD_EVENT: &str = "event";
const FIELD_RUN_NAME: &str = "runName";
const FIELD_UTC_TIME: &str = "utcTime";
const FIELD_TRACE: &str = "trace";
const FIELD_TRACE_EXIT: &str = "exit";
const FIELD_TRACE_PROCESS: &str = "process";

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// The `event` field of an inbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The workflow run started.
    Started,
    /// The workflow run finished successfully.
    Completed,
    /// The workflow run failed.
    Error,
    /// Any other notification (process submissions, progress, ...).
    Other(String),
}

impl LifecycleEvent {
    /// Parses the raw `event` string. Matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "started" => LifecycleEvent::Started,
            "completed" => LifecycleEvent::Completed,
            "error" => LifecycleEvent::Error,
            other => LifecycleEvent::Other(other.to_string()),
        }
    }

    /// Returns the wire representation of this event.
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleEvent::Started => "started",
            LifecycleEvent::Completed => "completed",
            LifecycleEvent::Error => "error",
            LifecycleEvent::Other(raw) => raw,
        }
    }

    /// Returns `true` if the backend wants to hear about this event.
    pub fn is_forwardable(&self) -> bool {
        match self {
            LifecycleEvent::Started | LifecycleEvent::Completed | LifecycleEvent::Error => true,
            LifecycleEvent::Other(_) => false,
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LifecycleEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Filtered events
// ---------------------------------------------------------------------------

/// Process-level detail flattened out of the inbound `trace` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    /// Copied from `trace.exit`.
    pub trace_exit: Value,
    /// Copied from `trace.process`.
    pub trace_name: Value,
}

/// The status update body posted to the backend.
///
/// Field order is the serialisation order: `run_name`, `utc_time`, `event`,
/// then the trace fields when present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredEvent {
    pub run_name: RunName,
    pub utc_time: String,
    pub event: LifecycleEvent,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceSummary>,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Reduces one inbound notification to the backend's status update shape.
///
/// Returns `Ok(None)` for events the backend does not track. Returns
/// [`RelayError::MalformedEvent`] when the payload is not a JSON object, when
/// `event` is missing, or when a forwardable event lacks one of the fields
/// copied into the [`FilteredEvent`]. An empty `runName` is reported as
/// [`RelayError::InvalidRunName`]. Fields of dropped events are never
/// inspected.
pub fn filter_message(message: &Value) -> Result<Option<FilteredEvent>, RelayError> {
    let fields = message
        .as_object()
        .ok_or_else(|| RelayError::wrong_type("<payload>", "JSON object"))?;

    let event = LifecycleEvent::parse(required_str(fields, FIELD_EVENT)?);
    if !event.is_forwardable() {
        tracing::info!(event = %event, "Ignoring non-lifecycle event");
        return Ok(None);
    }

    // An empty run name carries no workflow marker either.
    let run_name = RunName::new(required_str(fields, FIELD_RUN_NAME)?).ok_or_else(|| {
        RelayError::InvalidRunName {
            run_name: String::new(),
        }
    })?;
    let utc_time = required_str(fields, FIELD_UTC_TIME)?.to_string();

    let trace = match fields.get(FIELD_TRACE) {
        None => None,
        Some(raw) => {
            let trace = raw
                .as_object()
                .ok_or_else(|| RelayError::wrong_type(FIELD_TRACE, "JSON object"))?;
            Some(TraceSummary {
                trace_exit: required_value(trace, FIELD_TRACE_EXIT, "trace.exit")?.clone(),
                trace_name: required_value(trace, FIELD_TRACE_PROCESS, "trace.process")?.clone(),
            })
        }
    };

    let filtered = FilteredEvent {
        run_name,
        utc_time,
        event,
        trace,
    };
    tracing::info!(
        run_name = %filtered.run_name,
        event = %filtered.event,
        utc_time = %filtered.utc_time,
        has_trace = filtered.trace.is_some(),
        "Filtered message found"
    );
    Ok(Some(filtered))
}

fn required_value<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    label: &str,
) -> Result<&'a Value, RelayError> {
    fields.get(key).ok_or_else(|| RelayError::missing_field(label))
}

fn required_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, RelayError> {
    required_value(fields, key, key)?
        .as_str()
        .ok_or_else(|| RelayError::wrong_type(key, "string"))
}
