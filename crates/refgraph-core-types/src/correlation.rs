//! Correlation types for transaction tracking
//!
//! Every engine transaction carries a `RequestContext` so that log lines,
//! errors and events raised during one cascade can be correlated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Oid;

/// Unique identifier for one logical transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a new TransactionId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context propagated through a transaction
///
/// `creator` is the user resource on whose behalf new versions are created;
/// it is copied into version events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub transaction_id: TransactionId,
    pub creator: Option<Oid>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_creator(mut self, creator: Oid) -> Self {
        self.creator = Some(creator);
        self
    }
}
