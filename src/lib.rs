pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::EngineConfig;

pub use crate::adapters::{FileCatalogSource, HttpCatalogSource};
pub use crate::core::{
    alias::AliasNormalizer,
    cart::CartAssembler,
    catalog::{CatalogSnapshot, CatalogStore},
    engine::{CartPlan, MatchingEngine},
    refresh::{populate_if_empty, CatalogRefresher, RefreshHandle},
    resolver::{MatchResolver, MatchSettings},
    substitution::SubstitutionFinder,
};
pub use crate::domain::model::{
    AvailabilityStatus, CartLineItem, CartUpdate, IngredientRequest, MatchResult, MatchStrategy,
    Product, ProductMapping, SkippedItem,
};
pub use crate::domain::ports::CatalogSource;
pub use crate::utils::error::{CartMatchError, Result};
