use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Order Status Registry
// ============================================================================
//
// The closed set of statuses an order can carry. Lookups are
// case-insensitive and accept the legacy names still sent by older kitchen
// and totem clients; only canonical names are stored or emitted.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    InPreparation,
    Ready,
    Finished,
    AwaitingPayment,
    PaymentDeclined,
    PaymentApproved,
}

/// Status every new order starts in.
pub const INITIAL_STATUS: OrderStatus = OrderStatus::Received;

/// (name, status) pairs, canonical names first. Names are lowercase.
const REGISTRY: &[(&str, OrderStatus)] = &[
    ("received", OrderStatus::Received),
    ("in_preparation", OrderStatus::InPreparation),
    ("ready", OrderStatus::Ready),
    ("finished", OrderStatus::Finished),
    ("awaiting_payment", OrderStatus::AwaitingPayment),
    ("payment_declined", OrderStatus::PaymentDeclined),
    ("payment_approved", OrderStatus::PaymentApproved),
    // legacy
    ("recebido", OrderStatus::Received),
    ("em_preparacao", OrderStatus::InPreparation),
    ("pronto", OrderStatus::Ready),
    ("finalizado", OrderStatus::Finished),
    ("aguardando_pagamento", OrderStatus::AwaitingPayment),
    ("pagamento_recusado", OrderStatus::PaymentDeclined),
    ("pagamento_aprovado", OrderStatus::PaymentApproved),
];

impl OrderStatus {
    #[cfg(test)]
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Received,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::Finished,
        OrderStatus::AwaitingPayment,
        OrderStatus::PaymentDeclined,
        OrderStatus::PaymentApproved,
    ];

    /// Canonical name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::InPreparation => "in_preparation",
            OrderStatus::Ready => "ready",
            OrderStatus::Finished => "finished",
            OrderStatus::AwaitingPayment => "awaiting_payment",
            OrderStatus::PaymentDeclined => "payment_declined",
            OrderStatus::PaymentApproved => "payment_approved",
        }
    }

    /// Resolve a name (canonical or legacy, any case) to a status.
    pub fn lookup(name: &str) -> Option<OrderStatus> {
        let name = name.trim();
        REGISTRY
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, status)| *status)
    }

    /// Statuses reachable from this one when the lifecycle is enforced.
    pub fn successors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Received => &[OrderStatus::AwaitingPayment, OrderStatus::InPreparation],
            OrderStatus::AwaitingPayment => {
                &[OrderStatus::PaymentApproved, OrderStatus::PaymentDeclined]
            }
            OrderStatus::PaymentDeclined => &[OrderStatus::AwaitingPayment],
            OrderStatus::PaymentApproved => &[OrderStatus::InPreparation],
            OrderStatus::InPreparation => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Finished],
            OrderStatus::Finished => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::lookup(s).ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

pub fn is_valid_status(name: &str) -> bool {
    OrderStatus::lookup(name).is_some()
}

/// Check every entry, failing on the first one the registry does not know,
/// then resolve them.
///
/// The returned list keeps the caller's order with duplicates removed.
pub fn validate_statuses<S: AsRef<str>>(names: &[S]) -> Result<Vec<OrderStatus>, OrderError> {
    if let Some(unknown) = names.iter().map(|n| n.as_ref()).find(|n| !is_valid_status(n)) {
        return Err(OrderError::InvalidStatus(unknown.to_string()));
    }

    let mut statuses = Vec::with_capacity(names.len());
    for status in names.iter().filter_map(|n| OrderStatus::lookup(n.as_ref())) {
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

// ============================================================================
// Unit Tests
// ============================================================================
