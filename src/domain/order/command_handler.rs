use std::sync::Arc;

use chrono::Utc;

use crate::clients::ProductCatalog;
use crate::store::{NewOrderRecord, OrderRepository, StoreError};

use super::aggregate::TransitionPolicy;
use super::commands::{OrderCreated, OrderRequest};
use super::errors::OrderError;
use super::identifier::IdentifierCodec;
use super::mapper::to_records;
use super::status::{OrderStatus, INITIAL_STATUS};

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Write side: creation and status changes. Each command validates all of
// its input before the first store call and performs at most one write.
//
// ============================================================================

pub struct OrderCommandHandler {
    repo: Arc<dyn OrderRepository>,
    codec: Arc<dyn IdentifierCodec>,
    catalog: Arc<dyn ProductCatalog>,
    policy: TransitionPolicy,
}

impl OrderCommandHandler {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        codec: Arc<dyn IdentifierCodec>,
        catalog: Arc<dyn ProductCatalog>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            repo,
            codec,
            catalog,
            policy,
        }
    }

    /// Validate and persist a new order in its initial status.
    pub async fn create(&self, request: OrderRequest) -> Result<OrderCreated, OrderError> {
        request.validate_request()?;
        self.catalog.ensure_exists(&request.product_ids()).await?;

        let items = request.to_items();
        let item_count = items.len();
        let id = self
            .repo
            .insert(NewOrderRecord {
                customer_id: request.customer_id,
                items: to_records(&items),
                status: INITIAL_STATUS,
                notes: request.notes,
                created_at: Utc::now(),
            })
            .await
            .map_err(OrderError::persistence("creating order"))?;

        tracing::info!(
            order_id = %id,
            item_count = item_count,
            status = %INITIAL_STATUS,
            "Order created"
        );

        Ok(OrderCreated {
            id: self.codec.render(&id),
            status: INITIAL_STATUS,
        })
    }

    /// Set the status of one order, returning the canonical status written.
    pub async fn apply_status(
        &self,
        new_status: &str,
        raw_id: &str,
    ) -> Result<OrderStatus, OrderError> {
        let status: OrderStatus = new_status.parse()?;
        let id = self.codec.parse(raw_id)?;

        if self.policy.requires_current_status() {
            let current = match self.repo.find_by_id(&id).await {
                Ok(record) => record.status,
                Err(StoreError::NotFound) => return Err(OrderError::NotFound(id)),
                Err(e) => return Err(OrderError::persistence("loading order status")(e)),
            };
            self.policy.check(current, status)?;
        }

        match self.repo.update_status(&id, status).await {
            Ok(()) => {
                tracing::info!(order_id = %id, status = %status, "Order status applied");
                Ok(status)
            }
            Err(StoreError::NotFound) => Err(OrderError::NotFound(id)),
            Err(e) => Err(OrderError::persistence("updating order status")(e)),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
