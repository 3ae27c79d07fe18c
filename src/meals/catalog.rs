use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::info;

use crate::error::StoreError;
use crate::meals::domain::MealRecord;
use crate::meals::query::CatalogQuery;

/// Read-only meal catalog. No ordering is guaranteed on results.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find(&self, query: &CatalogQuery) -> Result<Vec<MealRecord>, StoreError>;
}

/// Catalog held in memory, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<MealRecord>,
}

impl InMemoryCatalog {
    /// Rejects records that break the catalog invariants, including duplicate identities.
    pub fn new(records: Vec<MealRecord>) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if r.name.trim().is_empty() {
                bail!("meal {} has an empty name", r.id);
            }
            let nutrition = [r.calories, r.protein_g, r.carbs_g, r.fat_g];
            if nutrition.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
                bail!("meal '{}' has negative or non-finite nutrition", r.name);
            }
            if !seen.insert(r.identity()) {
                bail!(
                    "duplicate meal '{}' for mood {} / {} / {}",
                    r.name,
                    r.mood,
                    r.hunger_level,
                    r.preference
                );
            }
        }
        Ok(Self { records })
    }

    /// Loads a JSON array of meal records.
    pub async fn load_json(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("read catalog file {}", path.display()))?;
        let records: Vec<MealRecord> = serde_json::from_slice(&raw)
            .with_context(|| format!("parse catalog file {}", path.display()))?;
        let catalog = Self::new(records)?;
        info!(path = %path.display(), meals = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find(&self, query: &CatalogQuery) -> Result<Vec<MealRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect())
    }
}
