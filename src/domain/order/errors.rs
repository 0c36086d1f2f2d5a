use crate::clients::CatalogError;
use crate::store::StoreError;

use super::identifier::OrderId;
use super::status::OrderStatus;

// ============================================================================
// Order Errors
// ============================================================================
//
// Every failure the order core can report. `kind()` sorts them into the
// three classes the HTTP boundary translates into responses.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad client input. Never retried.
    Validation,
    /// Well-formed identifier with no matching order.
    NotFound,
    /// Collaborator failure. Opaque to the client.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("{0} is not a valid status")]
    InvalidStatus(String),

    #[error("{0} is not a valid order id")]
    InvalidId(String),

    #[error("invalid order request: {0}")]
    InvalidRequest(String),

    #[error("unknown products: {}", .0.join(", "))]
    UnknownProducts(Vec<String>),

    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("product catalog: {0}")]
    Catalog(#[source] CatalogError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidStatus(_)
            | OrderError::InvalidId(_)
            | OrderError::InvalidRequest(_)
            | OrderError::UnknownProducts(_)
            | OrderError::InvalidTransition { .. } => ErrorKind::Validation,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::Persistence { .. } | OrderError::Catalog(_) => ErrorKind::Internal,
        }
    }

    /// Wrap a store failure with the operation that hit it.
    pub fn persistence(context: &'static str) -> impl FnOnce(StoreError) -> OrderError {
        move |source| OrderError::Persistence { context, source }
    }
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownProducts(ids) => OrderError::UnknownProducts(ids),
            other => OrderError::Catalog(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(OrderError::InvalidStatus("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(OrderError::InvalidId("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            OrderError::InvalidTransition {
                from: OrderStatus::Finished,
                to: OrderStatus::Received,
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            OrderError::NotFound(OrderId::new("abc")).kind(),
            ErrorKind::NotFound
        );
        let err = OrderError::persistence("listing orders")(StoreError::Corrupt("bad row".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "listing orders: corrupt record: bad row");
    }

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            OrderError::InvalidStatus("not_a_status".into()).to_string(),
            "not_a_status is not a valid status"
        );
        assert_eq!(
            OrderError::UnknownProducts(vec!["p1".into(), "p2".into()]).to_string(),
            "unknown products: p1, p2"
        );
    }

    #[test]
    fn test_unknown_products_from_catalog_is_validation() {
        let err: OrderError = CatalogError::UnknownProducts(vec!["p9".into()]).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: OrderError = CatalogError::Unavailable("connection refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
