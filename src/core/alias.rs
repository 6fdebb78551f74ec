//! Ingredient alias normalization.
//!
//! Upstream generators spell the same ingredient many ways ("white rice",
//! "Long grain rice", "rice"). The alias table folds those into one
//! canonical name before matching starts.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical name followed by the synonyms that resolve to it.
const ALIAS_TABLE: &[(&str, &[&str])] = &[
    // Grains
    ("Rice", &["long grain rice", "rice", "white rice"]),
    ("Parboiled Rice", &["jollof rice", "parboiled rice"]),
    ("Cornmeal", &["cornmeal", "pap flour", "corn flour"]),
    ("Garri", &["garri", "gari"]),
    ("Millet", &["millet", "millet flour"]),
    // Proteins
    ("Chicken", &["chicken", "poultry"]),
    ("Beef", &["beef", "cow meat"]),
    ("Fish", &["fish", "seafood", "frozen fish"]),
    ("Crayfish", &["crayfish", "dried shrimp", "shrimp"]),
    ("Stockfish", &["stockfish", "dried fish"]),
    ("Eggs", &["eggs", "chicken eggs"]),
    // Legumes
    ("Beans", &["beans", "black-eyed beans", "kidney beans"]),
    ("Lentils", &["lentils", "red lentils"]),
    ("Peas", &["peas", "split peas"]),
    // Vegetables
    ("Tomato", &["tomato", "fresh tomato"]),
    ("Onion", &["onion", "white onion"]),
    ("Pepper", &["pepper", "hot pepper", "scotch bonnet", "chilli"]),
    ("Bell Pepper", &["bell pepper", "green pepper", "sweet pepper"]),
    ("Spinach", &["spinach", "leafy greens"]),
    ("Carrot", &["carrot", "carrots"]),
    ("Cucumber", &["cucumber", "cucumbers"]),
    // Oils & seasonings
    ("Palm Oil", &["palm oil", "red oil"]),
    ("Vegetable Oil", &["vegetable oil", "cooking oil"]),
    ("Tomato Paste", &["tomato paste", "tomato puree"]),
    ("Egusi", &["egusi", "melon seeds"]),
    ("Salt", &["salt", "table salt"]),
    ("Garlic", &["garlic", "garlic cloves"]),
    ("Ginger", &["ginger", "ginger root"]),
    ("Curry Powder", &["curry powder", "curry"]),
    ("Thyme", &["thyme", "dried thyme"]),
];

static DEFAULT_ALIASES: LazyLock<HashMap<String, &'static str>> =
    LazyLock::new(|| invert(ALIAS_TABLE.iter().copied()));

fn invert<'a, I>(table: I) -> HashMap<String, &'a str>
where
    I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
{
    let mut map = HashMap::new();
    for (canonical, synonyms) in table {
        for synonym in synonyms {
            // 同義詞重複時保留先出現的標準名
            map.entry(match_key(synonym)).or_insert(canonical);
        }
    }
    map
}

/// Folds a name into the form used for every comparison: lowercase, trimmed,
/// `-`/`_` read as spaces, whitespace runs collapsed.
pub fn match_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct AliasNormalizer {
    synonyms: HashMap<String, String>,
}

impl AliasNormalizer {
    pub fn new() -> Self {
        Self {
            synonyms: DEFAULT_ALIASES
                .iter()
                .map(|(k, v)| (k.clone(), (*v).to_string()))
                .collect(),
        }
    }

    pub fn from_table<'a, I>(table: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        Self {
            synonyms: invert(table)
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
        }
    }

    /// Returns the canonical name on an alias hit, otherwise the folded input.
    pub fn normalize(&self, raw_name: &str) -> String {
        let key = match_key(raw_name);
        match self.synonyms.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

impl Default for AliasNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
