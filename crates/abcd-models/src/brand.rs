//! Brand vocabulary and resolved knowledge-graph entities.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Brand terms supplied with an assessment request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrandContext {
    pub brand_name: String,
    #[serde(default)]
    pub brand_variations: Vec<String>,
    #[serde(default)]
    pub branded_products: Vec<String>,
    #[serde(default)]
    pub product_categories: Vec<String>,
    #[serde(default)]
    pub branded_call_to_actions: Vec<String>,
}

impl BrandContext {
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            ..Default::default()
        }
    }

    /// Create a brand context from environment variables.
    ///
    /// List values are comma-delimited.
    pub fn from_env() -> Self {
        Self {
            brand_name: std::env::var("ABCD_BRAND_NAME").unwrap_or_default(),
            brand_variations: env_list("ABCD_BRAND_VARIATIONS"),
            branded_products: env_list("ABCD_BRANDED_PRODUCTS"),
            product_categories: env_list("ABCD_PRODUCT_CATEGORIES"),
            branded_call_to_actions: env_list("ABCD_BRANDED_CTAS"),
        }
    }

    pub fn with_variations(mut self, variations: &[&str]) -> Self {
        self.brand_variations = to_owned(variations);
        self
    }

    pub fn with_products(mut self, products: &[&str]) -> Self {
        self.branded_products = to_owned(products);
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.product_categories = to_owned(categories);
        self
    }

    pub fn with_call_to_actions(mut self, ctas: &[&str]) -> Self {
        self.branded_call_to_actions = to_owned(ctas);
        self
    }

    /// Brand name followed by its variations, without case-insensitive duplicates.
    pub fn brand_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        let candidates = std::iter::once(&self.brand_name).chain(self.brand_variations.iter());
        for term in candidates {
            let trimmed = term.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !terms.iter().any(|t| t.eq_ignore_ascii_case(trimmed)) {
                terms.push(trimmed.to_string());
            }
        }
        terms
    }
}

/// Split a comma-delimited list, trimming items and dropping empties.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_list(key: &str) -> Vec<String> {
    std::env::var(key).map(|v| parse_list(&v)).unwrap_or_default()
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Knowledge-graph entity matched to a brand or product term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeGraphEntity {
    /// Machine id without the `kg:` prefix, e.g. `/m/045c7b`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entities resolved once per video before any detector runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedEntities {
    #[serde(default)]
    pub brand: Vec<KnowledgeGraphEntity>,
    #[serde(default)]
    pub products: Vec<KnowledgeGraphEntity>,
}

impl ResolvedEntities {
    pub fn is_empty(&self) -> bool {
        self.brand.is_empty() && self.products.is_empty()
    }

    pub fn brand_has_id(&self, entity_id: &str) -> bool {
        !entity_id.is_empty() && self.brand.iter().any(|e| e.id == entity_id)
    }

    pub fn product_has_id(&self, entity_id: &str) -> bool {
        !entity_id.is_empty() && self.products.iter().any(|e| e.id == entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" Pixel 8 , ,Pixel Buds,"),
            vec!["Pixel 8".to_string(), "Pixel Buds".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_brand_terms_dedupes() {
        let brand = BrandContext::new("Google").with_variations(&["google", "Google Pixel", " "]);
        assert_eq!(brand.brand_terms(), vec!["Google".to_string(), "Google Pixel".to_string()]);
    }

    #[test]
    fn test_entity_lookup_ignores_empty_ids() {
        let entities = ResolvedEntities {
            brand: vec![KnowledgeGraphEntity {
                id: "/m/045c7b".to_string(),
                name: "Google".to_string(),
                description: None,
            }],
            products: vec![],
        };
        assert!(entities.brand_has_id("/m/045c7b"));
        assert!(!entities.brand_has_id(""));
        assert!(!entities.product_has_id("/m/045c7b"));
    }
}
