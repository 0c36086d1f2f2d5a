// ============================================================================
// Order Store - Persistence collaborator
// ============================================================================
//
// The order core only sees `OrderRepository`. Each backing store ships one
// adapter:
// - scylla_store - production store (ScyllaDB)
// - memory       - development and tests
//
// Records are the stored representation; `domain::order::mapper` turns them
// into domain orders.
//
// ============================================================================

mod memory;
mod scylla_store;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryOrderRepository;
pub use scylla_store::ScyllaOrderRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::order::{OrderId, OrderStatus};

/// A line item as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An order row as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: String,
    pub items: Vec<LineItemRecord>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to insert an order; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderRecord {
    pub customer_id: String,
    pub items: Vec<LineItemRecord>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders whose status is one of `statuses`.
    async fn find_by_statuses(&self, statuses: &[OrderStatus])
        -> Result<Vec<OrderRecord>, StoreError>;

    async fn find_all(&self) -> Result<Vec<OrderRecord>, StoreError>;

    /// `StoreError::NotFound` when no order has this id.
    async fn find_by_id(&self, id: &OrderId) -> Result<OrderRecord, StoreError>;

    /// Persist a new order and return the id the store assigned.
    async fn insert(&self, order: NewOrderRecord) -> Result<OrderId, StoreError>;

    /// Overwrite the status of one order. `StoreError::NotFound` when no
    /// order has this id.
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), StoreError>;
}
