//! Relation kind classification

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The seven relation universes an individual participates in.
///
/// Each kind names a per-owner collection in the store; mirrored kinds
/// (following/followers, blocked/blocked_by, pending/pending_with) are
/// always written together by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Following,
    Followers,
    Blocked,
    BlockedBy,
    Reciprocated,
    Pending,
    PendingWith,
}

impl RelationKind {
    /// All seven kinds, in the order the engine sweeps them.
    pub const ALL: [RelationKind; 7] = [
        RelationKind::Following,
        RelationKind::Followers,
        RelationKind::Blocked,
        RelationKind::BlockedBy,
        RelationKind::Reciprocated,
        RelationKind::Pending,
        RelationKind::PendingWith,
    ];

    /// Canonical tag, also the default collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Following => "following",
            RelationKind::Followers => "followers",
            RelationKind::Blocked => "blocked",
            RelationKind::BlockedBy => "blocked_by",
            RelationKind::Reciprocated => "reciprocated",
            RelationKind::Pending => "pending",
            RelationKind::PendingWith => "pending_with",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "following" => Ok(RelationKind::Following),
            "followers" => Ok(RelationKind::Followers),
            "blocked" => Ok(RelationKind::Blocked),
            "blocked_by" => Ok(RelationKind::BlockedBy),
            "reciprocated" => Ok(RelationKind::Reciprocated),
            "pending" => Ok(RelationKind::Pending),
            "pending_with" => Ok(RelationKind::PendingWith),
            other => Err(Error::InvalidRelationshipType(other.to_string())),
        }
    }
}

impl TryFrom<&str> for RelationKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for kind in RelationKind::ALL {
            assert_eq!(kind.as_str().parse::<RelationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "friended".parse::<RelationKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidRelationshipType(ref tag) if tag == "friended"));
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(RelationKind::BlockedBy.to_string(), "blocked_by");
        assert_eq!(RelationKind::PendingWith.to_string(), "pending_with");
    }
}
