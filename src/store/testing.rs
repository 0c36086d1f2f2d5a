use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{MemoryOrderRepository, NewOrderRecord, OrderRecord, OrderRepository, StoreError};
use crate::domain::order::{OrderId, OrderStatus};

// ============================================================================
// Test doubles for the order store
// ============================================================================

#[derive(Default)]
pub struct CallCounts {
    pub find_by_statuses: AtomicUsize,
    pub find_all: AtomicUsize,
    pub find_by_id: AtomicUsize,
    pub insert: AtomicUsize,
    pub update_status: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.find_by_statuses.load(Ordering::SeqCst)
            + self.find_all.load(Ordering::SeqCst)
            + self.find_by_id.load(Ordering::SeqCst)
            + self.insert.load(Ordering::SeqCst)
            + self.update_status.load(Ordering::SeqCst)
    }
}

/// Memory store that counts every call made through it.
#[derive(Clone, Default)]
pub struct RecordingRepository {
    pub inner: MemoryOrderRepository,
    pub calls: Arc<CallCounts>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for RecordingRepository {
    async fn find_by_statuses(
        &self,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, StoreError> {
        self.calls.find_by_statuses.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_statuses(statuses).await
    }

    async fn find_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        self.calls.find_all.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<OrderRecord, StoreError> {
        self.calls.find_by_id.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, order: NewOrderRecord) -> Result<OrderId, StoreError> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(order).await
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), StoreError> {
        self.calls.update_status.fetch_add(1, Ordering::SeqCst);
        self.inner.update_status(id, status).await
    }
}

/// Store whose every call fails as if the backend were down.
#[derive(Clone, Copy, Default)]
pub struct UnavailableRepository;

fn down() -> StoreError {
    StoreError::backend(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl OrderRepository for UnavailableRepository {
    async fn find_by_statuses(&self, _: &[OrderStatus]) -> Result<Vec<OrderRecord>, StoreError> {
        Err(down())
    }

    async fn find_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        Err(down())
    }

    async fn find_by_id(&self, _: &OrderId) -> Result<OrderRecord, StoreError> {
        Err(down())
    }

    async fn insert(&self, _: NewOrderRecord) -> Result<OrderId, StoreError> {
        Err(down())
    }

    async fn update_status(&self, _: &OrderId, _: OrderStatus) -> Result<(), StoreError> {
        Err(down())
    }
}
