use crate::core::catalog::CatalogSnapshot;
use crate::domain::model::Product;

pub const DEFAULT_CATEGORY_LIMIT: usize = 3;

/// Same-category fallback for products that cannot be bought as chosen.
#[derive(Debug, Clone)]
pub struct SubstitutionFinder {
    category_limit: usize,
}

impl SubstitutionFinder {
    pub fn new(category_limit: usize) -> Self {
        Self { category_limit }
    }

    /// Returns the second product of the chosen product's category scan.
    ///
    /// The scan is not checked against `chosen`: when `chosen` is not the
    /// first product of its category the result can be `chosen` itself, and
    /// an empty category scans the whole catalog.
    pub fn find_substitute<'a>(
        &self,
        chosen: &Product,
        snapshot: &'a CatalogSnapshot,
    ) -> Option<&'a Product> {
        if chosen.availability_status.is_available() {
            return None;
        }

        let same_category = snapshot.products_in_category(&chosen.category, self.category_limit);
        let substitute = same_category.get(1).copied();

        match substitute {
            Some(p) => tracing::debug!(
                "Substitute for '{}' ({}): '{}' ({})",
                chosen.name,
                chosen.availability_status,
                p.name,
                p.id
            ),
            None => tracing::debug!(
                "No substitute for '{}': {} product(s) in category '{}'",
                chosen.name,
                same_category.len(),
                chosen.category
            ),
        }
        substitute
    }
}

impl Default for SubstitutionFinder {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_LIMIT)
    }
}
