//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Amount in minor currency units (RWF)
pub type Amount = i64;

/// Error returned when a stored or submitted enum value is unknown
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Case-insensitive substring search over a record's text fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` for an empty or blank term, which matches everything
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn matches(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&self.0))
    }
}

/// Query string for list endpoints with free-text search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> Option<SearchTerm> {
        self.search.as_deref().and_then(SearchTerm::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_term_is_none() {
        assert!(SearchTerm::new("").is_none());
        assert!(SearchTerm::new("   ").is_none());
    }

    #[test]
    fn test_search_term_is_case_insensitive() {
        let term = SearchTerm::new(" WINE ").unwrap();
        assert!(term.matches(&["Elegant wine glasses"]));
        assert!(term.matches(&["Beer", "Wine Glass"]));
        assert!(!term.matches(&["Beer Glass", "Cocktail"]));
    }
}
