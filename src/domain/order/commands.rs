use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::OrderError;
use super::identifier::OrderId;
use super::status::OrderStatus;
use super::value_objects::OrderItem;

// ============================================================================
// Order Commands - Client input and its acknowledgements
// ============================================================================

/// Creation input. Unvalidated until `validate_request` passes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderRequest {
    #[validate(length(min = 1, max = 64, message = "customer_id is required"))]
    pub customer_id: String,

    #[validate(length(min = 1, max = 100, message = "at least one item is required"), nested)]
    pub items: Vec<OrderItemRequest>,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    #[validate(length(min = 1, max = 64, message = "product_id is required"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,

    #[validate(length(max = 200))]
    #[serde(default)]
    pub note: Option<String>,
}

impl OrderRequest {
    /// Check declared constraints, summarizing every violation.
    pub fn validate_request(&self) -> Result<(), OrderError> {
        self.validate()
            .map_err(|errors| OrderError::InvalidRequest(errors.to_string()))
    }

    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id.clone());
            }
        }
        ids
    }

    pub fn to_items(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|item| OrderItem {
                note: item.note.clone(),
                ..OrderItem::new(item.product_id.as_str(), item.quantity)
            })
            .collect()
    }
}

/// Body of a status change. The status stays raw text so the registry, not
/// the JSON extractor, decides whether it is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: OrderId,
    pub status: OrderStatus,
}
