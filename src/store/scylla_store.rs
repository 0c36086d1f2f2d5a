use std::sync::Arc;

use anyhow::{ensure, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::serialize::row::SerializeRow;
use scylla::value::Row;
use uuid::Uuid;

use super::{LineItemRecord, NewOrderRecord, OrderRecord, OrderRepository, StoreError};
use crate::domain::order::{OrderId, OrderStatus, UuidCodec};

// ============================================================================
// ScyllaDB Order Store
// ============================================================================
//
// One row per order in `orders`. Items are JSON text, status is its
// canonical name, and a secondary index on `status` serves the status
// listings. Status updates are lightweight transactions (`IF EXISTS`) so an
// unknown id is reported instead of upserting a ghost row.
//
// ============================================================================

const SELECT_COLUMNS: &str =
    "SELECT id, customer_id, items, status, notes, created_at, updated_at FROM orders";

type OrderRow = (
    Uuid,
    String,
    String,
    String,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

pub struct ScyllaOrderRepository {
    session: Arc<Session>,
}

impl ScyllaOrderRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Connect, then create the keyspace, table and index if missing.
    pub async fn connect(nodes: &[String], keyspace: &str) -> Result<Self> {
        ensure!(
            !keyspace.is_empty()
                && keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "invalid keyspace name: {keyspace}"
        );

        tracing::info!(nodes = ?nodes, keyspace = %keyspace, "Connecting to ScyllaDB");
        let session: Session = SessionBuilder::new().known_nodes(nodes).build().await?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
                ),
                &[],
            )
            .await?;
        session.use_keyspace(keyspace, false).await?;

        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS orders (
                    id uuid PRIMARY KEY,
                    customer_id text,
                    items text,
                    status text,
                    notes text,
                    created_at timestamp,
                    updated_at timestamp
                )",
                &[],
            )
            .await?;
        session
            .query_unpaged(
                "CREATE INDEX IF NOT EXISTS orders_status_idx ON orders (status)",
                &[],
            )
            .await?;

        tracing::info!(keyspace = %keyspace, "✅ Order schema ready");
        Ok(Self::new(Arc::new(session)))
    }

    async fn select<V>(&self, query: &str, values: V) -> Result<Vec<OrderRecord>, StoreError>
    where
        V: SerializeRow + Send,
    {
        let result = self
            .session
            .query_unpaged(query, values)
            .await
            .map_err(StoreError::backend)?;

        let rows_result = result
            .into_rows_result()
            .map_err(|e| not_rows(query, e))?;

        let mut records = Vec::new();
        for row in rows_result.rows::<OrderRow>().map_err(StoreError::backend)? {
            records.push(decode_row(row.map_err(StoreError::backend)?)?);
        }
        Ok(records)
    }
}

fn decode_row(row: OrderRow) -> Result<OrderRecord, StoreError> {
    let (id, customer_id, items, status, notes, created_at, updated_at) = row;

    let items: Vec<LineItemRecord> = serde_json::from_str(&items)?;
    let status = OrderStatus::lookup(&status)
        .ok_or_else(|| StoreError::Corrupt(format!("order {id} has unknown status {status:?}")))?;

    Ok(OrderRecord {
        id: UuidCodec::from_uuid(id),
        customer_id,
        items,
        status,
        notes,
        created_at,
        updated_at,
    })
}

fn not_rows(query: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("expected rows from {query:?}: {reason}"))
}

/// The `[applied]` flag of a conditional statement. Scylla appends the
/// row's current columns after it, so only the first column is read.
fn applied_flag(row: Option<Row>) -> Result<bool, StoreError> {
    let row = row.ok_or_else(|| StoreError::Corrupt("conditional update returned no rows".into()))?;
    match row.columns.first() {
        Some(Some(value)) => value
            .as_boolean()
            .ok_or_else(|| StoreError::Corrupt(format!("[applied] is not a boolean: {value:?}"))),
        _ => Err(StoreError::Corrupt("conditional update returned no [applied] column".into())),
    }
}

/// Ids that are not UUIDs cannot exist in this store.
fn row_key(id: &OrderId) -> Result<Uuid, StoreError> {
    UuidCodec::to_uuid(id).map_err(|_| StoreError::NotFound)
}

fn oldest_first(mut records: Vec<OrderRecord>) -> Vec<OrderRecord> {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    records
}

#[async_trait]
impl OrderRepository for ScyllaOrderRepository {
    async fn find_by_statuses(
        &self,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderRecord>, StoreError> {
        let query = format!("{SELECT_COLUMNS} WHERE status = ?");
        let mut records = Vec::new();

        // The index only serves equality, so one query per status.
        for status in statuses {
            let found = self.select(&query, (status.as_str(),)).await?;
            tracing::debug!(status = %status, count = found.len(), "Loaded orders by status");
            records.extend(found);
        }

        Ok(oldest_first(records))
    }

    async fn find_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let records = self.select(SELECT_COLUMNS, ()).await?;
        tracing::debug!(count = records.len(), "Loaded all orders");
        Ok(oldest_first(records))
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<OrderRecord, StoreError> {
        let key = row_key(id)?;
        let query = format!("{SELECT_COLUMNS} WHERE id = ?");

        self.select(&query, (key,))
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, order: NewOrderRecord) -> Result<OrderId, StoreError> {
        let key = Uuid::new_v4();
        let items = serde_json::to_string(&order.items)?;

        self.session
            .query_unpaged(
                "INSERT INTO orders (id, customer_id, items, status, notes, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                (
                    key,
                    order.customer_id,
                    items,
                    order.status.as_str(),
                    order.notes,
                    order.created_at,
                    order.created_at,
                ),
            )
            .await
            .map_err(StoreError::backend)?;

        let id = UuidCodec::from_uuid(key);
        tracing::info!(order_id = %id, status = %order.status, "✅ Persisted order");
        Ok(id)
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let key = row_key(id)?;

        let result = self
            .session
            .query_unpaged(
                "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? IF EXISTS",
                (status.as_str(), Utc::now(), key),
            )
            .await
            .map_err(StoreError::backend)?;

        let row = result
            .into_rows_result()
            .map_err(|e| not_rows("conditional status update", e))?
            .maybe_first_row::<Row>()
            .map_err(StoreError::backend)?;

        if !applied_flag(row)? {
            return Err(StoreError::NotFound);
        }

        tracing::info!(order_id = %id, status = %status, "✅ Updated order status");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use scylla::value::CqlValue;

    use super::*;

    fn row(status: &str, items: &str) -> OrderRow {
        let now = Utc::now();
        (
            Uuid::new_v4(),
            "customer-1".to_string(),
            items.to_string(),
            status.to_string(),
            None,
            now,
            now,
        )
    }

    #[test]
    fn test_decode_row() {
        let record = decode_row(row(
            "in_preparation",
            r#"[{"product_id":"x-burger","quantity":2}]"#,
        ))
        .unwrap();

        assert_eq!(record.status, OrderStatus::InPreparation);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);
    }

    #[test]
    fn test_decode_row_rejects_unknown_status() {
        let err = decode_row(row("shipped", "[]")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(ref msg) if msg.contains("shipped")));
    }

    #[test]
    fn test_decode_row_rejects_bad_items() {
        let err = decode_row(row("ready", "not json")).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_applied_flag_ignores_trailing_columns() {
        let applied = Row {
            columns: vec![
                Some(CqlValue::Boolean(true)),
                Some(CqlValue::Uuid(Uuid::new_v4())),
                Some(CqlValue::Text("ready".into())),
            ],
        };
        assert!(applied_flag(Some(applied)).unwrap());

        // A missing row reports false with nulls for the row's columns.
        let missing = Row {
            columns: vec![Some(CqlValue::Boolean(false)), None, None],
        };
        assert!(!applied_flag(Some(missing)).unwrap());

        let bare = Row {
            columns: vec![Some(CqlValue::Boolean(false))],
        };
        assert!(!applied_flag(Some(bare)).unwrap());
    }

    #[test]
    fn test_applied_flag_rejects_malformed_results() {
        assert!(matches!(applied_flag(None), Err(StoreError::Corrupt(_))));
        assert!(matches!(
            applied_flag(Some(Row { columns: vec![] })),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            applied_flag(Some(Row { columns: vec![Some(CqlValue::Int(1))] })),
            Err(StoreError::Corrupt(ref msg)) if msg.contains("not a boolean")
        ));
    }

    #[test]
    fn test_missing_rows_result_is_corrupt() {
        let err = not_rows(SELECT_COLUMNS, "Result is not of Rows kind");
        assert!(matches!(
            err,
            StoreError::Corrupt(ref msg) if msg.contains("FROM orders") && msg.contains("not of Rows kind")
        ));
    }

    #[test]
    fn test_non_uuid_ids_are_not_found() {
        assert!(matches!(row_key(&OrderId::new("abc")), Err(StoreError::NotFound)));
    }
}
