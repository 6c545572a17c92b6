//! Scope (relationship namespace) type

use serde::{Deserialize, Serialize};

/// A scope partitions relationships into independent universes for the same
/// pair of ids: following someone in scope "work" says nothing about scope
/// "friends".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope(String);

impl Scope {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scope() {
        assert_eq!(Scope::default().as_str(), "default");
    }

    #[test]
    fn test_scopes_compare_by_label() {
        assert_eq!(Scope::from("work"), Scope::new("work"));
        assert_ne!(Scope::from("work"), Scope::default());
    }
}
