use std::fmt;

use serde::Serialize;

use crate::domain::{DomainError, DomainValidator};

/// A filesystem-safe project directory name.
///
/// Invariant: non-empty, no path separators, not `.`/`..`, no characters
/// that are illegal in a directory entry name. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Strip surrounding whitespace and quote characters, then validate.
    pub fn sanitize(candidate: &str) -> Result<Self, DomainError> {
        let trimmed = candidate.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
        DomainValidator::validate_project_name(trimmed)?;
        Ok(Self(trimmed.to_owned()))
    }

    /// The base used for generated names.
    pub(crate) fn default_base() -> Self {
        Self(crate::domain::naming::DEFAULT_BASE_NAME.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
