use crate::adapters::decode::decode_products;
use crate::domain::model::Product;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{CartMatchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Pulls the product list from a catalog service endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpCatalogSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let mut request = self.client.get(&self.endpoint);

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making catalog request to: {}", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if !status.is_success() {
            return Err(CartMatchError::CatalogSourceError {
                source_name: self.describe(),
                message: format!("unexpected status {}", status),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let products = decode_products(payload);
        tracing::info!("📥 Fetched {} products from {}", products.len(), self.endpoint);
        Ok(products)
    }

    fn describe(&self) -> String {
        format!("http({})", self.endpoint)
    }
}
