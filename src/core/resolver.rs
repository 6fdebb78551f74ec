//! Tiered ingredient → product resolution.
//!
//! Tiers run in a fixed order and the first one that yields a candidate
//! wins: exact/substring (0.95), fuzzy (similarity ratio), category (0.6),
//! then an unmatched result. Lower tiers are never consulted after a hit.

use crate::core::alias::{match_key, AliasNormalizer};
use crate::core::catalog::CatalogSnapshot;
use crate::core::similarity::similarity_ratio;
use crate::core::substitution::{SubstitutionFinder, DEFAULT_CATEGORY_LIMIT};
use crate::domain::model::{MatchResult, MatchStrategy, Product, ProductMapping};

pub const EXACT_CONFIDENCE: f64 = 0.95;
pub const CATEGORY_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.7;

/// Category → representative ingredient keywords, scanned in this order.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("grains", &["rice", "cornmeal", "garri", "millet", "bread flour"]),
    ("proteins", &["chicken", "beef", "fish", "eggs", "crayfish", "stockfish"]),
    ("legumes", &["beans", "lentils", "peas"]),
    ("vegetables", &["tomato", "onion", "pepper", "spinach", "carrot", "cucumber"]),
    ("oils", &["palm oil", "vegetable oil"]),
    ("seasonings", &["salt", "garlic", "ginger", "curry powder", "thyme", "tomato paste"]),
    ("dairy", &["milk", "cheese", "butter", "yogurt"]),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Inclusive lower bound for the fuzzy tier.
    pub fuzzy_threshold: f64,
    pub category_candidate_limit: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            category_candidate_limit: DEFAULT_CATEGORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub product: &'a Product,
    pub confidence: f64,
    pub strategy: MatchStrategy,
}

/// Category whose keyword list has an entry equal to, or contained in, `key`.
pub fn infer_category(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        return None;
    }
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| key == *kw || key.contains(kw)))
        .map(|(category, _)| *category)
}

#[derive(Debug, Clone, Default)]
pub struct MatchResolver {
    normalizer: AliasNormalizer,
    substitutions: SubstitutionFinder,
    settings: MatchSettings,
}

impl MatchResolver {
    pub fn new(normalizer: AliasNormalizer, settings: MatchSettings) -> Self {
        Self {
            normalizer,
            substitutions: SubstitutionFinder::new(settings.category_candidate_limit),
            settings,
        }
    }

    pub fn resolve(
        &self,
        ingredient_name: &str,
        quantity: f64,
        unit: &str,
        snapshot: &CatalogSnapshot,
    ) -> MatchResult {
        let candidates = self.candidates(ingredient_name, snapshot);

        let Some(best) = candidates.first() else {
            tracing::debug!("No match for '{}'", ingredient_name);
            return MatchResult {
                ingredient_name: ingredient_name.to_string(),
                quantity,
                unit: unit.to_string(),
                mapping: None,
                notes: format!(
                    "No product match found for '{}'. User can search manually.",
                    ingredient_name
                ),
            };
        };

        let substitute = self.substitutions.find_substitute(best.product, snapshot);
        tracing::debug!(
            "'{}' -> '{}' via {} match ({:.2})",
            ingredient_name,
            best.product.name,
            best.strategy.as_str(),
            best.confidence
        );

        MatchResult {
            ingredient_name: ingredient_name.to_string(),
            quantity,
            unit: unit.to_string(),
            mapping: Some(ProductMapping {
                product_id: best.product.id.clone(),
                product_name: best.product.name.clone(),
                product_price: best.product.price,
                availability_status: best.product.availability_status,
                substitute_product_id: substitute.map(|p| p.id.clone()),
                confidence_score: best.confidence,
                strategy: Some(best.strategy),
            }),
            notes: format!(
                "Mapped with {:.0}% confidence ({} match)",
                best.confidence * 100.0,
                best.strategy.as_str()
            ),
        }
    }

    /// Ranked candidates from the first tier that produces any. Empty when no
    /// tier matches.
    pub fn candidates<'a>(
        &self,
        ingredient_name: &str,
        snapshot: &'a CatalogSnapshot,
    ) -> Vec<Candidate<'a>> {
        let key = match_key(&self.normalizer.normalize(ingredient_name));

        if let Some(product) = self.exact_match(&key, snapshot) {
            return vec![Candidate {
                product,
                confidence: EXACT_CONFIDENCE,
                strategy: MatchStrategy::Exact,
            }];
        }

        let fuzzy = self.fuzzy_matches(&key, snapshot);
        if !fuzzy.is_empty() {
            return fuzzy;
        }

        self.category_matches(&key, snapshot)
    }

    fn exact_match<'a>(&self, key: &str, snapshot: &'a CatalogSnapshot) -> Option<&'a Product> {
        if key.is_empty() {
            return None;
        }
        snapshot.products().iter().find(|p| {
            let name = match_key(&p.name);
            name == key || name.contains(key)
        })
    }

    fn fuzzy_matches<'a>(&self, key: &str, snapshot: &'a CatalogSnapshot) -> Vec<Candidate<'a>> {
        let mut matches: Vec<Candidate<'a>> = snapshot
            .products()
            .iter()
            .filter_map(|product| {
                let ratio = similarity_ratio(key, &match_key(&product.name));
                (ratio >= self.settings.fuzzy_threshold).then_some(Candidate {
                    product,
                    confidence: ratio,
                    strategy: MatchStrategy::Fuzzy,
                })
            })
            .collect();

        // sort_by 為穩定排序，同分時保留目錄順序
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches
    }

    fn category_matches<'a>(
        &self,
        key: &str,
        snapshot: &'a CatalogSnapshot,
    ) -> Vec<Candidate<'a>> {
        let Some(category) = infer_category(key) else {
            return Vec::new();
        };

        snapshot
            .products_in_category(category, self.settings.category_candidate_limit)
            .into_iter()
            .map(|product| Candidate {
                product,
                confidence: CATEGORY_CONFIDENCE,
                strategy: MatchStrategy::Category,
            })
            .collect()
    }
}
