//! Process configuration.
//!
//! Built once by the binary from command-line arguments and handed to the
//! [`crate::Dispatcher`] by value. Nothing mutates it afterwards.

use crate::{CallbackToken, Namespace, RelayError, RunName};

/// Domain under which every namespace's backend is hosted.
pub const DEFAULT_BACKEND_DOMAIN: &str = "intervenegeneticscores.org";

/// Where and how status updates are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    namespace: Namespace,
    token: CallbackToken,
    backend_domain: String,
}

impl RelayConfig {
    /// Creates a configuration targeting [`DEFAULT_BACKEND_DOMAIN`].
    pub fn new(namespace: Namespace, token: CallbackToken) -> Self {
        Self {
            namespace,
            token,
            backend_domain: DEFAULT_BACKEND_DOMAIN.to_string(),
        }
    }

    /// Replaces the backend domain.
    ///
    /// Returns [`RelayError::Configuration`] if `domain` is empty or carries a
    /// scheme or path.
    pub fn with_backend_domain(mut self, domain: impl Into<String>) -> Result<Self, RelayError> {
        let domain = domain.into();
        if domain.is_empty() || domain.contains("://") || domain.contains('/') {
            return Err(RelayError::Configuration {
                message: format!("backend domain must be a bare host name, got '{domain}'"),
            });
        }
        self.backend_domain = domain;
        Ok(self)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn token(&self) -> &CallbackToken {
        &self.token
    }

    /// Host that receives status updates, e.g. `test.intervenegeneticscores.org`.
    pub fn backend_host(&self) -> String {
        format!("{}.{}", self.namespace, self.backend_domain)
    }

    /// Status endpoint for one workflow run.
    pub fn status_url(&self, run_name: &RunName) -> String {
        format!(
            "https://{}/pipeline-manager/csc/pipeline/{}/status",
            self.backend_host(),
            run_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(namespace: &str) -> RelayConfig {
        RelayConfig::new(
            Namespace::select(namespace),
            CallbackToken::new("token").unwrap(),
        )
    }

    #[test]
    fn status_url_uses_lowercase_namespace() {
        let run_name = RunName::new("INTP00000000408").unwrap();
        assert_eq!(
            config("TEST").status_url(&run_name),
            "https://test.intervenegeneticscores.org/pipeline-manager/csc/pipeline/INTP00000000408/status"
        );
    }

    #[test]
    fn literal_namespace_is_used_as_host_label() {
        assert_eq!(config("sandbox").backend_host(), "sandbox.intervenegeneticscores.org");
    }

    #[test]
    fn backend_domain_can_be_overridden() {
        let cfg = config("dev").with_backend_domain("example.org").unwrap();
        assert_eq!(cfg.backend_host(), "dev.example.org");
    }

    #[test]
    fn backend_domain_must_be_bare_host() {
        for bad in ["", "https://example.org", "example.org/api"] {
            assert!(matches!(
                config("dev").with_backend_domain(bad),
                Err(RelayError::Configuration { .. })
            ));
        }
    }
}
