use crate::domain::model::Product;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Immutable point-in-time copy of the product catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
    version: u64,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>) -> Self {
        Self::with_version(products, 0)
    }

    fn with_version(products: Vec<Product>, version: u64) -> Self {
        Self {
            products,
            version,
            loaded_at: Utc::now(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Products whose lowercased category equals or contains `category`, in
    /// catalog order, at most `limit` of them. An empty `category` matches
    /// every product.
    pub fn products_in_category(&self, category: &str, limit: usize) -> Vec<&Product> {
        let wanted = category.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.category.to_lowercase().contains(&wanted))
            .take(limit)
            .collect()
    }
}

/// Holds the current snapshot. Readers clone an `Arc` out; writers swap it.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
    next_version: AtomicU64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::new(Vec::new()))),
            next_version: AtomicU64::new(1),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        store.replace(products);
        store
    }

    pub fn current_snapshot(&self) -> Arc<CatalogSnapshot> {
        // 鎖只保護指標複製，不會在持鎖期間做任何匹配
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Installs a new snapshot and returns its version. Readers holding the
    /// previous snapshot keep it until they drop it.
    pub fn replace(&self, products: Vec<Product>) -> u64 {
        let count = products.len();

        let (version, previous) = {
            let mut guard = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // 版本號在寫鎖內取得，安裝順序與版本順序一致
            let version = self.next_version.fetch_add(1, Ordering::Relaxed);
            let snapshot = Arc::new(CatalogSnapshot::with_version(products, version));
            (version, std::mem::replace(&mut *guard, snapshot))
        };

        tracing::info!(
            "📦 Catalog replaced: {} products (version {} -> {})",
            count,
            previous.version(),
            version
        );
        version
    }

    pub fn is_empty(&self) -> bool {
        self.current_snapshot().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.current_snapshot().version()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
