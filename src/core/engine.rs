use crate::core::cart::CartAssembler;
use crate::core::catalog::{CatalogSnapshot, CatalogStore};
use crate::core::resolver::MatchResolver;
use crate::domain::model::{CartUpdate, IngredientRequest, MatchResult};
use crate::utils::error::{CartMatchError, Result};
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

impl Validate for IngredientRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CartMatchError::validation("ingredient name cannot be empty"));
        }
        Ok(())
    }
}

/// Matches of one batch together with the cart built from them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPlan {
    pub catalog_version: u64,
    pub catalog_loaded_at: DateTime<Utc>,
    pub matches: Vec<MatchResult>,
    pub cart: CartUpdate,
}

pub struct MatchingEngine {
    store: Arc<CatalogStore>,
    resolver: MatchResolver,
    assembler: CartAssembler,
}

impl MatchingEngine {
    pub fn new(store: Arc<CatalogStore>, resolver: MatchResolver) -> Self {
        Self {
            store,
            resolver,
            assembler: CartAssembler::new(),
        }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn map_ingredient(&self, request: &IngredientRequest) -> Result<MatchResult> {
        request.validate()?;
        let snapshot = self.store.current_snapshot();
        Ok(self
            .resolver
            .resolve(&request.name, request.quantity, &request.unit, &snapshot))
    }

    /// Validates the whole batch before resolving any of it, then resolves
    /// every request against the same snapshot.
    pub fn map_ingredients(&self, requests: &[IngredientRequest]) -> Result<Vec<MatchResult>> {
        validate_batch(requests)?;
        let snapshot = self.store.current_snapshot();
        Ok(self.resolve_batch(requests, &snapshot))
    }

    fn resolve_batch(
        &self,
        requests: &[IngredientRequest],
        snapshot: &CatalogSnapshot,
    ) -> Vec<MatchResult> {
        if snapshot.is_empty() {
            tracing::warn!("⚠️ Catalog is empty; {} ingredient(s) will be unmatched", requests.len());
        }

        let results: Vec<MatchResult> = requests
            .iter()
            .map(|r| self.resolver.resolve(&r.name, r.quantity, &r.unit, snapshot))
            .collect();

        let matched = results.iter().filter(|r| r.is_matched()).count();
        tracing::info!(
            "🔎 Mapped {}/{} ingredients against catalog version {}",
            matched,
            results.len(),
            snapshot.version()
        );
        results
    }

    pub fn assemble_cart(&self, results: &[MatchResult], cart_id: &str) -> CartUpdate {
        self.assembler.assemble(results, cart_id)
    }

    pub fn plan_cart(&self, requests: &[IngredientRequest], cart_id: &str) -> Result<CartPlan> {
        validate_batch(requests)?;
        let snapshot = self.store.current_snapshot();
        let matches = self.resolve_batch(requests, &snapshot);
        let cart = self.assemble_cart(&matches, cart_id);
        Ok(CartPlan {
            catalog_version: snapshot.version(),
            catalog_loaded_at: snapshot.loaded_at(),
            matches,
            cart,
        })
    }
}

fn validate_batch(requests: &[IngredientRequest]) -> Result<()> {
    for (index, request) in requests.iter().enumerate() {
        request.validate().map_err(|_| {
            CartMatchError::validation(format!(
                "ingredient #{} has an empty name",
                index + 1
            ))
        })?;
    }
    Ok(())
}
