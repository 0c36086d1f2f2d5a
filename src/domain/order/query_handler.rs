use std::sync::Arc;

use crate::store::{OrderRecord, OrderRepository, StoreError};

use super::aggregate::Order;
use super::errors::OrderError;
use super::identifier::IdentifierCodec;
use super::mapper::OrderMapper;
use super::status::validate_statuses;

// ============================================================================
// Order Query Handler
// ============================================================================
//
// Read side: validate the request, ask the store, map records to orders.
// Nothing here writes.
//
// ============================================================================

pub struct OrderQueryHandler {
    repo: Arc<dyn OrderRepository>,
    mapper: Arc<dyn OrderMapper>,
    codec: Arc<dyn IdentifierCodec>,
}

impl OrderQueryHandler {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        mapper: Arc<dyn OrderMapper>,
        codec: Arc<dyn IdentifierCodec>,
    ) -> Self {
        Self { repo, mapper, codec }
    }

    /// Orders in any of `statuses`. One unknown status fails the whole call
    /// before the store is touched.
    pub async fn list_by_status<S: AsRef<str>>(
        &self,
        statuses: &[S],
    ) -> Result<Vec<Order>, OrderError> {
        let statuses = validate_statuses(statuses)?;
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .repo
            .find_by_statuses(&statuses)
            .await
            .map_err(OrderError::persistence("listing orders by status"))?;

        tracing::debug!(statuses = ?statuses, count = records.len(), "Listed orders by status");
        Ok(self.present(records))
    }

    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let records = self
            .repo
            .find_all()
            .await
            .map_err(OrderError::persistence("listing all orders"))?;

        tracing::debug!(count = records.len(), "Listed all orders");
        Ok(self.present(records))
    }

    pub async fn find_by_id(&self, raw_id: &str) -> Result<Order, OrderError> {
        let id = self.codec.parse(raw_id)?;

        match self.repo.find_by_id(&id).await {
            Ok(record) => {
                let mut order = self.mapper.to_model(record);
                order.id = self.codec.render(&order.id);
                Ok(order)
            }
            Err(StoreError::NotFound) => Err(OrderError::NotFound(id)),
            Err(e) => Err(OrderError::persistence("loading order detail")(e)),
        }
    }

    /// Map records to orders whose ids are in client form.
    fn present(&self, records: Vec<OrderRecord>) -> Vec<Order> {
        self.mapper
            .to_models(records)
            .into_iter()
            .map(|mut order| {
                order.id = self.codec.render(&order.id);
                order
            })
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
