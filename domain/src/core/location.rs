//! Location value object

use serde::{Deserialize, Serialize};

/// The place a research run analyzes (Value Object)
///
/// Free-form text such as `"Austin, TX"`. The only invariant is that it is
/// not blank; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location {
    name: String,
}

impl Location {
    /// Try to create a location, returning None if blank
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                name: trimmed.to_string(),
            })
        }
    }

    /// Get the location text
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// File-name friendly slug: lower-cased, commas dropped, and every other
    /// character outside `[a-z0-9_-]` turned into an underscore.
    ///
    /// `"Austin, TX"` becomes `"austin_tx"`. The slug never contains a path
    /// separator or a dot, and is never empty.
    pub fn slug(&self) -> String {
        let slug = self
            .name
            .to_lowercase()
            .chars()
            .filter(|&c| c != ',')
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();
        let slug = slug.trim_matches('_');
        if slug.is_empty() {
            "location".to_string()
        } else {
            slug.to_string()
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::str::FromStr for Location {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
            .ok_or_else(|| crate::core::error::DomainError::InvalidLocation(s.to_string()))
    }
}
