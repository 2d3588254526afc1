//! Newtype identifiers and credentials.
//!
//! A workflow run name and a backend token are both plain strings on the wire.
//! Wrapping them keeps a token from ever being logged as a run name, and keeps
//! the workflow-identifier rule next to the type it constrains.

use serde::Serialize;

/// Marker every workflow run identifier carries (e.g. `INTP00000000408`).
pub const WORKFLOW_ID_MARKER: &str = "INTP";

// ---------------------------------------------------------------------------
// Run names
// ---------------------------------------------------------------------------

/// Identifies one workflow run, taken from the inbound `runName` field.
///
/// Forms the last dynamic segment of the backend status URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunName(String);

impl RunName {
    /// Creates a new run name, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the run name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this run name carries the workflow identifier marker.
    pub fn is_workflow_id(&self) -> bool {
        self.0.contains(WORKFLOW_ID_MARKER)
    }
}

impl std::fmt::Display for RunName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Opaque token used to authenticate against the backend.
///
/// The token is pre-formatted by whoever issued it and is inserted into the
/// `Authorization` header verbatim. `Debug` and `Display` never reveal it.
#[derive(Clone, PartialEq, Eq)]
pub struct CallbackToken(String);

impl CallbackToken {
    /// Creates a token, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw token for use in request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Renders the `Authorization` header value for this token.
    pub fn basic_authorization(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl std::fmt::Debug for CallbackToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackToken(<redacted>)")
    }
}

impl std::fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

impl std::str::FromStr for CallbackToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| "callback token must not be empty".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_name_rejects_empty() {
        assert!(RunName::new("").is_none());
    }

    #[test]
    fn workflow_marker_may_appear_anywhere() {
        assert!(RunName::new("INTP00000000408").unwrap().is_workflow_id());
        assert!(RunName::new("retry-INTP42").unwrap().is_workflow_id());
        assert!(!RunName::new("intp00000000408").unwrap().is_workflow_id());
        assert!(!RunName::new("happy_euler").unwrap().is_workflow_id());
    }

    #[test]
    fn token_is_never_printed() {
        let token = CallbackToken::new("s3cr3t").unwrap();
        assert!(!format!("{token:?}").contains("s3cr3t"));
        assert!(!token.to_string().contains("s3cr3t"));
        assert_eq!(token.expose(), "s3cr3t");
    }

    #[test]
    fn token_is_inserted_verbatim() {
        let token: CallbackToken = "dXNlcjpwYXNz".parse().unwrap();
        assert_eq!(token.basic_authorization(), "Basic dXNlcjpwYXNz");
        assert!("".parse::<CallbackToken>().is_err());
    }
}
