//! Actor (individual) identifier type

use serde::{Deserialize, Serialize};

/// Opaque identifier for an individual in the social graph.
///
/// Ids are supplied by the caller, not generated here; numeric ids are
/// stored in their decimal form so `ActorId::from(11)` and
/// `ActorId::from("11")` name the same individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for ActorId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl From<u64> for ActorId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<i64> for ActorId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_agree() {
        assert_eq!(ActorId::from(11u64), ActorId::from("11"));
        assert_eq!(ActorId::from(11u64).as_str(), "11");
    }

    #[test]
    fn test_display() {
        assert_eq!(ActorId::new("abc").to_string(), "abc");
    }
}
