//! Identifier and timestamp newtypes shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a proposal.
///
/// Assigned once at creation and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub Uuid);

impl ProposalId {
    /// Create a new random proposal ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProposalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prop:{}", self.0)
    }
}

/// The principal a proposal belongs to.
///
/// Every proposal has exactly one owner: the account that requested the
/// analysis and the only account allowed to decide it. Gateway operations
/// are always scoped to an owner; a foreign owner sees "not found", never
/// a distinct "forbidden".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// Create a new random owner ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner:{}", self.0)
    }
}

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Whether this timestamp lies in the future.
    #[must_use]
    pub fn is_future(&self) -> bool {
        self.0 > Utc::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_id_unique() {
        let a = ProposalId::new();
        let b = ProposalId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("prop:"));
    }

    #[test]
    fn test_owner_id_display() {
        let id = OwnerId::new();
        assert!(id.to_string().starts_with("owner:"));
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = Timestamp::now();
        let later = Timestamp(earlier.0 + chrono::Duration::seconds(1));
        assert!(earlier < later);
        assert!(!earlier.is_future());
    }
}
