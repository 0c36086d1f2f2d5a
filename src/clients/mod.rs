// ============================================================================
// Clients - Services this one consumes but does not own
// ============================================================================

mod product_catalog;

pub use product_catalog::{
    CatalogError, HttpProductCatalog, OpenCatalog, ProductCatalog,
};
