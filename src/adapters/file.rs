use crate::adapters::decode::decode_products;
use crate::domain::model::Product;
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the product list from a JSON file on every fetch, so edits to the
/// file show up on the next refresh.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let payload: serde_json::Value = serde_json::from_slice(&bytes)?;
        let products = decode_products(payload);
        tracing::debug!(
            "Loaded {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }

    fn describe(&self) -> String {
        format!("file({})", self.path.display())
    }
}
