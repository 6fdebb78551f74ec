use crate::domain::model::IngredientRequest;
use crate::utils::error::Result;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct IngredientRow {
    name: String,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
}

impl From<IngredientRow> for IngredientRequest {
    fn from(row: IngredientRow) -> Self {
        IngredientRequest::new(row.name, row.quantity.unwrap_or(0.0), row.unit.unwrap_or_default())
    }
}

/// CSV with a `name,quantity,unit` header row.
pub fn read_ingredients_csv<R: Read>(reader: R) -> Result<Vec<IngredientRequest>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut requests = Vec::new();
    for row in csv_reader.deserialize::<IngredientRow>() {
        requests.push(row?.into());
    }
    Ok(requests)
}

pub fn read_ingredients_json(content: &str) -> Result<Vec<IngredientRequest>> {
    Ok(serde_json::from_str(content)?)
}

/// Picks the reader by extension: `.json` is JSON, anything else CSV.
pub fn load_ingredients<P: AsRef<Path>>(path: P) -> Result<Vec<IngredientRequest>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let requests = if is_json {
        read_ingredients_json(&std::fs::read_to_string(path)?)?
    } else {
        read_ingredients_csv(std::fs::File::open(path)?)?
    };

    tracing::debug!("Read {} ingredients from {}", requests.len(), path.display());
    Ok(requests)
}
