//! Deployment namespace selection.
//!
//! The namespace becomes the leftmost label of the backend host, so rendering
//! always yields the canonical lowercase label. Unknown input is kept as a
//! literal host label instead of being rejected, which lets operators point
//! the relay at an ad-hoc environment.

/// A backend deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Development environment (`dev`).
    Dev,
    /// Test environment (`test`).
    Test,
    /// Production environment (`prod`).
    Prod,
    /// Any other host label, passed through unchanged.
    Literal(String),
}

impl Namespace {
    /// Selects a namespace from operator input.
    ///
    /// Matching is case-insensitive. `development` and `production` are
    /// accepted as aliases of `dev` and `prod`. Anything else is returned as
    /// [`Namespace::Literal`] with the input untouched.
    pub fn select(input: &str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "dev" | "development" => Namespace::Dev,
            "test" => Namespace::Test,
            "prod" | "production" => Namespace::Prod,
            _ => Namespace::Literal(input.to_string()),
        }
    }

    /// Returns the host label for this namespace.
    pub fn as_str(&self) -> &str {
        match self {
            Namespace::Dev => "dev",
            Namespace::Test => "test",
            Namespace::Prod => "prod",
            Namespace::Literal(label) => label,
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    /// Like [`Namespace::select`], but rejects empty input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("namespace must not be empty".to_string());
        }
        Ok(Self::select(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_match_case_insensitively() {
        for (input, expected) in [
            ("dev", Namespace::Dev),
            ("DEV", Namespace::Dev),
            ("Development", Namespace::Dev),
            ("test", Namespace::Test),
            ("TeSt", Namespace::Test),
            ("prod", Namespace::Prod),
            ("PRODUCTION", Namespace::Prod),
        ] {
            assert_eq!(Namespace::select(input), expected, "input {input}");
        }
    }

    #[test]
    fn unknown_input_passes_through_unchanged() {
        let ns = Namespace::select("Staging-EU");
        assert_eq!(ns, Namespace::Literal("Staging-EU".to_string()));
        assert_eq!(ns.to_string(), "Staging-EU");
    }

    #[test]
    fn known_names_render_lowercase() {
        let rendered: Vec<String> = [Namespace::Dev, Namespace::Test, Namespace::Prod]
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(rendered, ["dev", "test", "prod"]);
        assert_eq!(Namespace::select("TEST").to_string(), "test");
    }

    #[test]
    fn from_str_rejects_empty() {
        assert!("".parse::<Namespace>().is_err());
        assert!("   ".parse::<Namespace>().is_err());
        assert_eq!("Prod".parse::<Namespace>().unwrap(), Namespace::Prod);
    }
}
