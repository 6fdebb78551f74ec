use crate::domain::model::Product;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where fresh product lists come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;

    fn describe(&self) -> String;
}

