use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;

// ============================================================================
// Order Identifiers
// ============================================================================
//
// `OrderId` is opaque to the core: it is whatever canonical text the store's
// identifier scheme produces. An `IdentifierCodec` is the only thing that
// knows what a well-formed id looks like, so swapping storage engines means
// swapping the codec.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an already-canonical id. Callers holding external input go
    /// through an `IdentifierCodec` instead.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait IdentifierCodec: Send + Sync {
    /// Parse external input into a canonical id.
    fn parse(&self, raw: &str) -> Result<OrderId, OrderError>;

    /// Render an id for clients. Whatever this returns, `parse` accepts.
    fn format(&self, id: &OrderId) -> String {
        id.as_str().to_string()
    }

    /// `format`, wrapped for models and acknowledgements sent back out.
    fn render(&self, id: &OrderId) -> OrderId {
        OrderId::new(self.format(id))
    }
}

/// Ids are UUIDs in hyphenated lowercase form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodec;

impl UuidCodec {
    pub fn from_uuid(uuid: Uuid) -> OrderId {
        OrderId(uuid.hyphenated().to_string())
    }

    pub fn to_uuid(id: &OrderId) -> Result<Uuid, OrderError> {
        Uuid::parse_str(id.as_str()).map_err(|_| OrderError::InvalidId(id.to_string()))
    }
}

impl IdentifierCodec for UuidCodec {
    fn parse(&self, raw: &str) -> Result<OrderId, OrderError> {
        Uuid::parse_str(raw.trim())
            .map(Self::from_uuid)
            .map_err(|_| OrderError::InvalidId(raw.to_string()))
    }
}

/// Ids travel as `ord-<uuid>`.
#[cfg(test)]
pub(crate) struct TaggedCodec;

#[cfg(test)]
impl IdentifierCodec for TaggedCodec {
    fn parse(&self, raw: &str) -> Result<OrderId, OrderError> {
        let trimmed = raw.trim();
        let bare = trimmed.strip_prefix("ord-").unwrap_or(trimmed);
        UuidCodec
            .parse(bare)
            .map_err(|_| OrderError::InvalidId(raw.to_string()))
    }

    fn format(&self, id: &OrderId) -> String {
        format!("ord-{id}")
    }
}
