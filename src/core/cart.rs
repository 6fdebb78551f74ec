use crate::domain::model::{
    AvailabilityStatus, CartLineItem, CartUpdate, MatchResult, SkippedItem,
};

pub const SKIP_REASON_UNAVAILABLE: &str = "Not available at catalog";

/// Turns a batch of match results into cart intent. Never fails: items that
/// cannot be bought are listed in `skipped_items`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartAssembler;

impl CartAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, match_results: &[MatchResult], cart_id: &str) -> CartUpdate {
        let mut items = Vec::new();
        let mut skipped_items = Vec::new();
        let mut total_amount = 0.0;

        for result in match_results {
            let Some(line) = Self::line_item(result) else {
                skipped_items.push(SkippedItem {
                    ingredient_name: result.ingredient_name.clone(),
                    reason: SKIP_REASON_UNAVAILABLE.to_string(),
                });
                continue;
            };

            total_amount += line.subtotal;
            items.push(line);
        }

        tracing::info!(
            "🛒 Cart {}: {} added, {} skipped, total {:.2}",
            cart_id,
            items.len(),
            skipped_items.len(),
            total_amount
        );

        CartUpdate {
            cart_id: cart_id.to_string(),
            added_count: items.len(),
            skipped_count: skipped_items.len(),
            total_amount,
            items,
            skipped_items,
        }
    }

    fn line_item(result: &MatchResult) -> Option<CartLineItem> {
        let mapping = result.mapping.as_ref()?;
        if mapping.availability_status == AvailabilityStatus::Unavailable
            && mapping.substitute_product_id.is_none()
        {
            return None;
        }

        // 非 available 時改用替代品；substitute 狀態但沒有替代品時沿用原商品
        let product_id = if mapping.availability_status.is_available() {
            mapping.product_id.clone()
        } else {
            mapping
                .substitute_product_id
                .clone()
                .unwrap_or_else(|| mapping.product_id.clone())
        };

        // 單價沿用原匹配商品，不以替代品重新計價
        let unit_price = mapping.product_price;
        Some(CartLineItem {
            product_id,
            product_name: mapping.product_name.clone(),
            quantity: result.quantity,
            unit: result.unit.clone(),
            unit_price,
            subtotal: unit_price * result.quantity,
            from_meal_plan: true,
            source_ingredient_name: result.ingredient_name.clone(),
        })
    }
}
