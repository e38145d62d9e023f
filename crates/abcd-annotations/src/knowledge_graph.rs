//! Knowledge-graph entity lookup.
//!
//! Brand and product terms are resolved to knowledge-graph entities once per
//! video so logo and label annotations can be matched by entity id.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use abcd_models::{BrandContext, KnowledgeGraphEntity, ResolvedEntities};

use crate::error::{AnnotationError, AnnotationResult};

const DEFAULT_BASE_URL: &str = "https://kgsearch.googleapis.com";
const SEARCH_LIMIT: u32 = 10;

/// Resolves free-text terms to knowledge-graph entities.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Entities whose name equals `query`, ignoring case.
    async fn lookup(&self, query: &str) -> AnnotationResult<Vec<KnowledgeGraphEntity>>;
}

/// Knowledge Graph Search API client.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "itemListElement", default)]
    item_list_element: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl KnowledgeGraphClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from `KG_API_KEY`, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var("KG_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Self::new)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EntityLookup for KnowledgeGraphClient {
    async fn lookup(&self, query: &str) -> AnnotationResult<Vec<KnowledgeGraphEntity>> {
        let url = format!("{}/v1/entities:search", self.base_url.trim_end_matches('/'));
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("limit", limit.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnnotationError::knowledge_graph(format!(
                "search for \"{}\" returned {}: {}",
                query, status, body
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        let entities = parsed
            .item_list_element
            .into_iter()
            .map(|item| item.result)
            .filter(|r| r.name.eq_ignore_ascii_case(query.trim()))
            .map(|r| KnowledgeGraphEntity {
                id: r.id.strip_prefix("kg:").unwrap_or(&r.id).to_string(),
                name: r.name,
                description: r.description,
            })
            .collect::<Vec<_>>();

        debug!(query = %query, matches = entities.len(), "Knowledge graph lookup complete");
        Ok(entities)
    }
}

/// Fixed term-to-entity table, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEntityLookup {
    entities: HashMap<String, Vec<KnowledgeGraphEntity>>,
}

impl StaticEntityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, query: &str, entity: KnowledgeGraphEntity) -> Self {
        self.entities.entry(query.to_lowercase()).or_default().push(entity);
        self
    }
}

#[async_trait]
impl EntityLookup for StaticEntityLookup {
    async fn lookup(&self, query: &str) -> AnnotationResult<Vec<KnowledgeGraphEntity>> {
        Ok(self.entities.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }
}

/// Resolve brand terms and branded products to entities.
///
/// A failed lookup is logged and contributes no entities, so matching falls
/// back to plain term comparison.
pub async fn resolve_entities(lookup: &dyn EntityLookup, brand: &BrandContext) -> ResolvedEntities {
    ResolvedEntities {
        brand: resolve_terms(lookup, &brand.brand_terms()).await,
        products: resolve_terms(lookup, &brand.branded_products).await,
    }
}

async fn resolve_terms(lookup: &dyn EntityLookup, terms: &[String]) -> Vec<KnowledgeGraphEntity> {
    let lookups = terms.iter().map(|term| async move { (term, lookup.lookup(term).await) });
    let results = futures::future::join_all(lookups).await;

    let mut entities: Vec<KnowledgeGraphEntity> = Vec::new();
    for (term, result) in results {
        match result {
            Ok(found) => {
                for entity in found {
                    if !entities.iter().any(|e| e.id == entity.id) {
                        entities.push(entity);
                    }
                }
            }
            Err(e) => warn!(term = %term, "Knowledge graph lookup failed: {}", e),
        }
    }
    entities
}
