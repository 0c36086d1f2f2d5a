use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewOrderRecord, OrderRecord, OrderRepository, StoreError};
use crate::domain::order::{OrderId, OrderStatus, UuidCodec};

// ============================================================================
// In-memory Order Store
// ============================================================================
//
// Keeps orders in a map for development runs and tests. Nothing survives a
// restart. Ids are v4 UUIDs so the same `UuidCodec` serves both stores.
//
// ============================================================================

#[derive(Clone, Default)]
pub struct MemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

/// Oldest first, so listings are stable across calls.
fn sorted(mut records: Vec<OrderRecord>) -> Vec<OrderRecord> {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    records
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn find_by_statuses(
        &self,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, StoreError> {
        let orders = self.orders.read().await;
        let matching = orders
            .values()
            .filter(|order| statuses.contains(&order.status))
            .cloned()
            .collect();
        Ok(sorted(matching))
    }

    async fn find_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let orders = self.orders.read().await;
        Ok(sorted(orders.values().cloned().collect()))
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<OrderRecord, StoreError> {
        let orders = self.orders.read().await;
        orders.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn insert(&self, order: NewOrderRecord) -> Result<OrderId, StoreError> {
        let id = UuidCodec::from_uuid(Uuid::new_v4());
        let record = OrderRecord {
            id: id.clone(),
            customer_id: order.customer_id,
            items: order.items,
            status: order.status,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.created_at,
        };

        let mut orders = self.orders.write().await;
        orders.insert(id.clone(), record);
        Ok(id)
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(id).ok_or(StoreError::NotFound)?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LineItemRecord;

    fn new_order(status: OrderStatus) -> NewOrderRecord {
        NewOrderRecord {
            customer_id: "customer-1".to_string(),
            items: vec![LineItemRecord {
                product_id: "x-burger".to_string(),
                quantity: 1,
                note: None,
            }],
            status,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_basic_operations() {
        let repo = MemoryOrderRepository::new();

        let id = repo.insert(new_order(OrderStatus::Received)).await.unwrap();
        assert_eq!(repo.len().await, 1);

        let record = repo.find_by_id(&id).await.unwrap();
        assert_eq!(record.status, OrderStatus::Received);
        assert_eq!(record.created_at, record.updated_at);

        repo.update_status(&id, OrderStatus::Ready).await.unwrap();
        let record = repo.find_by_id(&id).await.unwrap();
        assert_eq!(record.status, OrderStatus::Ready);
        assert!(record.updated_at >= record.created_at);
    }

    #[tokio::test]
    async fn test_missing_ids_report_not_found() {
        let repo = MemoryOrderRepository::new();
        let id = UuidCodec::from_uuid(Uuid::new_v4());

        assert!(matches!(repo.find_by_id(&id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            repo.update_status(&id, OrderStatus::Ready).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_by_statuses_filters() {
        let repo = MemoryOrderRepository::new();
        let received = repo.insert(new_order(OrderStatus::Received)).await.unwrap();
        let ready = repo.insert(new_order(OrderStatus::Ready)).await.unwrap();
        repo.insert(new_order(OrderStatus::Finished)).await.unwrap();

        let found = repo
            .find_by_statuses(&[OrderStatus::Received, OrderStatus::Ready])
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&received));
        assert!(ids.contains(&ready));

        assert!(repo.find_by_statuses(&[]).await.unwrap().is_empty());
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }
}
