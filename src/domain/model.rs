use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
    Substitute,
}

impl AvailabilityStatus {
    /// 目錄資料寬鬆解析：缺值視為 available，無法辨識的值視為 unavailable
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            None => Self::Available,
            Some(s) if s.is_empty() => Self::Available,
            Some(s) => match s.as_str() {
                "available" | "in_stock" => Self::Available,
                "substitute" => Self::Substitute,
                _ => Self::Unavailable,
            },
        }
    }

    pub fn is_available(self) -> bool {
        self == Self::Available
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Substitute => "substitute",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        availability_status: AvailabilityStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            availability_status,
        }
    }
}

/// One ingredient line handed over by the upstream generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl IngredientRequest {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    Exact,
    Fuzzy,
    Category,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::Category => "category",
        }
    }
}

/// Product side of a successful match. Only exists when a product was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMapping {
    pub product_id: String,
    pub product_name: String,
    pub product_price: f64,
    pub availability_status: AvailabilityStatus,
    pub substitute_product_id: Option<String>,
    pub confidence_score: f64,
    pub strategy: Option<MatchStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MatchRecord", try_from = "MatchRecord")]
pub struct MatchResult {
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub mapping: Option<ProductMapping>,
    pub notes: String,
}

impl MatchResult {
    pub fn mapped_product_id(&self) -> Option<&str> {
        self.mapping.as_ref().map(|m| m.product_id.as_str())
    }

    pub fn product_name(&self) -> Option<&str> {
        self.mapping.as_ref().map(|m| m.product_name.as_str())
    }

    pub fn product_price(&self) -> Option<f64> {
        self.mapping.as_ref().map(|m| m.product_price)
    }

    pub fn substitute_product_id(&self) -> Option<&str> {
        self.mapping
            .as_ref()
            .and_then(|m| m.substitute_product_id.as_deref())
    }

    pub fn availability_status(&self) -> AvailabilityStatus {
        self.mapping
            .as_ref()
            .map_or(AvailabilityStatus::Unavailable, |m| m.availability_status)
    }

    pub fn confidence_score(&self) -> f64 {
        self.mapping.as_ref().map_or(0.0, |m| m.confidence_score)
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        self.mapping.as_ref().and_then(|m| m.strategy)
    }

    pub fn is_matched(&self) -> bool {
        self.mapping.is_some()
    }
}

/// Flat wire shape of [`MatchResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchRecord {
    ingredient_name: String,
    #[serde(default)]
    quantity: f64,
    #[serde(default)]
    unit: String,
    mapped_product_id: Option<String>,
    product_name: Option<String>,
    product_price: Option<f64>,
    availability_status: AvailabilityStatus,
    substitute_product_id: Option<String>,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    match_strategy: Option<MatchStrategy>,
    #[serde(default)]
    notes: String,
}

impl From<MatchResult> for MatchRecord {
    fn from(result: MatchResult) -> Self {
        let status = result.availability_status();
        let confidence = result.confidence_score();
        let MatchResult {
            ingredient_name,
            quantity,
            unit,
            mapping,
            notes,
        } = result;

        match mapping {
            Some(m) => Self {
                ingredient_name,
                quantity,
                unit,
                mapped_product_id: Some(m.product_id),
                product_name: Some(m.product_name),
                product_price: Some(m.product_price),
                availability_status: status,
                substitute_product_id: m.substitute_product_id,
                confidence_score: confidence,
                match_strategy: m.strategy,
                notes,
            },
            None => Self {
                ingredient_name,
                quantity,
                unit,
                mapped_product_id: None,
                product_name: None,
                product_price: None,
                availability_status: status,
                substitute_product_id: None,
                confidence_score: confidence,
                match_strategy: None,
                notes,
            },
        }
    }
}

impl TryFrom<MatchRecord> for MatchResult {
    type Error = String;

    fn try_from(record: MatchRecord) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&record.confidence_score) {
            return Err(format!(
                "confidenceScore {} is outside [0, 1]",
                record.confidence_score
            ));
        }

        let mapping = match record.mapped_product_id {
            Some(product_id) => Some(ProductMapping {
                product_id,
                product_name: record.product_name.unwrap_or_default(),
                product_price: record.product_price.unwrap_or(0.0),
                availability_status: record.availability_status,
                substitute_product_id: record.substitute_product_id,
                confidence_score: record.confidence_score,
                strategy: record.match_strategy,
            }),
            None => {
                if record.availability_status != AvailabilityStatus::Unavailable
                    || record.confidence_score != 0.0
                {
                    return Err(format!(
                        "'{}' has no mappedProductId but is {} with confidence {}",
                        record.ingredient_name,
                        record.availability_status,
                        record.confidence_score
                    ));
                }
                None
            }
        };

        Ok(Self {
            ingredient_name: record.ingredient_name,
            quantity: record.quantity,
            unit: record.unit,
            mapping,
            notes: record.notes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub subtotal: f64,
    pub from_meal_plan: bool,
    pub source_ingredient_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    pub ingredient_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    pub cart_id: String,
    pub added_count: usize,
    pub skipped_count: usize,
    pub total_amount: f64,
    pub items: Vec<CartLineItem>,
    pub skipped_items: Vec<SkippedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_status() {
        assert_eq!(
            AvailabilityStatus::parse_lenient(None),
            AvailabilityStatus::Available
        );
        assert_eq!(
            AvailabilityStatus::parse_lenient(Some(" Substitute ")),
            AvailabilityStatus::Substitute
        );
        assert_eq!(
            AvailabilityStatus::parse_lenient(Some("out_of_stock")),
            AvailabilityStatus::Unavailable
        );
    }

    #[test]
    fn test_unmatched_result_serializes_with_null_product_fields() {
        let result = MatchResult {
            ingredient_name: "Dragonfruit".to_string(),
            quantity: 1.0,
            unit: "pcs".to_string(),
            mapping: None,
            notes: "none".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mappedProductId"], serde_json::Value::Null);
        assert_eq!(json["availabilityStatus"], "unavailable");
        assert_eq!(json["confidenceScore"], 0.0);
        assert!(json.get("matchStrategy").is_none());
    }

    #[test]
    fn test_deserialize_rejects_unmapped_available_result() {
        let json = serde_json::json!({
            "ingredientName": "Salt",
            "quantity": 1.0,
            "unit": "g",
            "mappedProductId": null,
            "productName": null,
            "productPrice": null,
            "availabilityStatus": "available",
            "substituteProductId": null,
            "confidenceScore": 0.95,
            "notes": ""
        });

        assert!(serde_json::from_value::<MatchResult>(json).is_err());
    }

    #[test]
    fn test_deserialize_mapped_result() {
        let json = serde_json::json!({
            "ingredientName": "Salt",
            "quantity": 2.0,
            "unit": "g",
            "mappedProductId": "p9",
            "productName": "Table Salt 500g",
            "productPrice": 150.0,
            "availabilityStatus": "unavailable",
            "substituteProductId": "p10",
            "confidenceScore": 0.95,
            "matchStrategy": "exact",
            "notes": ""
        });

        let result: MatchResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.mapped_product_id(), Some("p9"));
        assert_eq!(result.substitute_product_id(), Some("p10"));
        assert_eq!(result.strategy(), Some(MatchStrategy::Exact));
        assert_eq!(result.availability_status(), AvailabilityStatus::Unavailable);
    }
}
