use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

// ============================================================================
// Product Catalog Client
// ============================================================================
//
// Orders reference products by id; the catalog service owns them. Creation
// asks the catalog whether every referenced product exists before anything
// is written.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown products: {}", .0.join(", "))]
    UnknownProducts(Vec<String>),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected catalog response: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Ok when every id is known, `UnknownProducts` naming the rest otherwise.
    async fn ensure_exists(&self, product_ids: &[String]) -> Result<(), CatalogError>;
}

/// Accepts every product. Used when no catalog is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCatalog;

#[async_trait]
impl ProductCatalog for OpenCatalog {
    async fn ensure_exists(&self, _product_ids: &[String]) -> Result<(), CatalogError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ProductRef {
    id: String,
}

/// Looks products up with `GET {base_url}/products?ids=a,b`, which answers
/// with the subset it knows as `[{"id": ...}]`.
pub struct HttpProductCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Ids from `requested` the catalog did not return, in request order.
fn missing_ids(requested: &[String], found: &[ProductRef]) -> Vec<String> {
    let known: HashSet<&str> = found.iter().map(|p| p.id.as_str()).collect();
    requested
        .iter()
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect()
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn ensure_exists(&self, product_ids: &[String]) -> Result<(), CatalogError> {
        if product_ids.is_empty() {
            return Ok(());
        }

        let url = format!("{}/products", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", product_ids.join(","))])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "Product catalog request failed");
                CatalogError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "Product catalog returned an error");
            return Err(CatalogError::BadResponse(format!("status {status}")));
        }

        let found: Vec<ProductRef> = response
            .json()
            .await
            .map_err(|e| CatalogError::BadResponse(e.to_string()))?;

        let missing = missing_ids(product_ids, &found);
        if missing.is_empty() {
            tracing::debug!(count = product_ids.len(), "All products found in catalog");
            Ok(())
        } else {
            tracing::warn!(missing = ?missing, "Order references unknown products");
            Err(CatalogError::UnknownProducts(missing))
        }
    }
}
