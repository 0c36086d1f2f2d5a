// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain-specific code, free of HTTP and storage driver types. Each
// aggregate has its own subdirectory.
//
// ============================================================================

pub mod order;
