use crate::store::{LineItemRecord, OrderRecord};

use super::aggregate::Order;
use super::value_objects::OrderItem;

/// Turns stored records into domain orders. Pure and total.
pub trait OrderMapper: Send + Sync {
    fn to_model(&self, record: OrderRecord) -> Order;

    fn to_models(&self, records: Vec<OrderRecord>) -> Vec<Order> {
        records.into_iter().map(|record| self.to_model(record)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper;

impl OrderMapper for RecordMapper {
    fn to_model(&self, record: OrderRecord) -> Order {
        Order {
            id: record.id,
            customer_id: record.customer_id,
            items: record.items.into_iter().map(to_item).collect(),
            status: record.status,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn to_item(record: LineItemRecord) -> OrderItem {
    OrderItem {
        product_id: record.product_id,
        quantity: record.quantity,
        note: record.note,
    }
}

/// The inverse direction, used when persisting new orders.
pub fn to_records(items: &[OrderItem]) -> Vec<LineItemRecord> {
    items
        .iter()
        .map(|item| LineItemRecord {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            note: item.note.clone(),
        })
        .collect()
}
