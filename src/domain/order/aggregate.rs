use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::identifier::OrderId;
use super::status::OrderStatus;
use super::value_objects::OrderItem;

// ============================================================================
// Order - Domain Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Transition Policy
// ============================================================================
//
// Whether a status change must follow the kitchen lifecycle or may write any
// registered status over any other.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any registered status may replace any other.
    #[default]
    Unrestricted,
    /// Only moves listed in `OrderStatus::successors` are accepted.
    Lifecycle,
}

impl TransitionPolicy {
    /// Whether the policy needs the order's current status before writing.
    pub fn requires_current_status(&self) -> bool {
        matches!(self, TransitionPolicy::Lifecycle)
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        match self {
            TransitionPolicy::Unrestricted => Ok(()),
            TransitionPolicy::Lifecycle => {
                if from == to || from.successors().contains(&to) {
                    Ok(())
                } else {
                    Err(OrderError::InvalidTransition { from, to })
                }
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
