use crate::domain::model::{AvailabilityStatus, Product};
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id", "product_id", "productId"];
const NAME_KEYS: &[&str] = &["name", "product_name", "productName"];
const STATUS_KEYS: &[&str] = &["availability_status", "availabilityStatus", "availability"];

/// Decodes a catalog payload: either a bare array of products or an object
/// with a `products` array. Entries that are not objects are dropped; missing
/// fields become empty strings or zero.
pub fn decode_products(payload: Value) -> Vec<Product> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("Catalog payload is an object without a 'products' array");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!("Unexpected catalog payload type: {}", json_type(&other));
            return Vec::new();
        }
    };

    let total = items.len();
    let products: Vec<Product> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(decode_product(&obj)),
            _ => None,
        })
        .collect();

    if products.len() < total {
        tracing::warn!(
            "Dropped {} non-object catalog entries",
            total - products.len()
        );
    }
    products
}

fn decode_product(obj: &Map<String, Value>) -> Product {
    Product {
        id: first_string(obj, ID_KEYS),
        name: first_string(obj, NAME_KEYS),
        category: first_string(obj, &["category"]),
        price: price(obj.get("price")),
        availability_status: AvailabilityStatus::parse_lenient(
            STATUS_KEYS
                .iter()
                .find_map(|k| obj.get(*k))
                .and_then(Value::as_str),
        ),
    }
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
        .unwrap_or_default()
}

fn price(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    // 價格不得為負，NaN 也歸零
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_bare_array() {
        let products = decode_products(json!([
            {"id": "p1", "name": "Long Grain Rice 5kg", "category": "grains", "price": 3500, "availability_status": "available"},
            {"id": "p2", "name": "Tomato Paste 400g", "category": "seasonings", "price": 800.5, "availability_status": "unavailable"}
        ]));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, 3500.0);
        assert_eq!(products[1].availability_status, AvailabilityStatus::Unavailable);
    }

    #[test]
    fn test_decode_wrapped_object_with_aliases() {
        let products = decode_products(json!({
            "products": [
                {"product_id": 42, "product_name": "Fresh Chicken", "price": "45000", "availability": "substitute"}
            ]
        }));

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "42");
        assert_eq!(products[0].name, "Fresh Chicken");
        assert_eq!(products[0].category, "");
        assert_eq!(products[0].price, 45000.0);
        assert_eq!(products[0].availability_status, AvailabilityStatus::Substitute);
    }

    #[test]
    fn test_missing_fields_default_to_empty_and_zero() {
        let products = decode_products(json!([{}, "junk", 7, {"name": "Salt", "price": -3}]));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "");
        assert_eq!(products[0].price, 0.0);
        assert_eq!(products[0].availability_status, AvailabilityStatus::Available);
        assert_eq!(products[1].price, 0.0);
    }

    #[test]
    fn test_unexpected_payload_yields_empty_catalog() {
        assert!(decode_products(json!("nope")).is_empty());
        assert!(decode_products(json!({"items": []})).is_empty());
    }
}
