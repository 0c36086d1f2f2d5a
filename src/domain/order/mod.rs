// ============================================================================
// Order Domain - The order status lifecycle
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Status registry (OrderStatus, validate_statuses)
// - Identifiers (OrderId, IdentifierCodec)
// - Value objects and the Order model
// - Commands (OrderRequest, StatusRequest)
// - Errors (OrderError and its ErrorKind)
// - Mapper (stored record -> Order)
// - Query and command handlers
//
// Storage lives behind `crate::store::OrderRepository`.
//
// ============================================================================

pub mod status;
pub mod identifier;
pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod mapper;
pub mod query_handler;
pub mod command_handler;

// Re-export for convenience
pub use status::*;
pub use identifier::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use mapper::RecordMapper;
pub use query_handler::*;
pub use command_handler::*;
