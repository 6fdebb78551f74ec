pub mod alias;
pub mod cart;
pub mod catalog;
pub mod engine;
pub mod refresh;
pub mod resolver;
pub mod similarity;
pub mod substitution;

pub use crate::domain::model::{
    AvailabilityStatus, CartLineItem, CartUpdate, IngredientRequest, MatchResult, MatchStrategy,
    Product, ProductMapping, SkippedItem,
};
pub use crate::domain::ports::CatalogSource;
pub use crate::utils::error::Result;
