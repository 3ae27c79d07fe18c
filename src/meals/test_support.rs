use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::meals::catalog::CatalogStore;
use crate::meals::domain::{Category, HungerLevel, MealRecord, Mood, Preference};
use crate::meals::query::CatalogQuery;

/// Light, Healthy, any meal time, not vegetarian, no allergens.
pub fn meal(name: &str, mood: Mood, category: Category) -> MealRecord {
    MealRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        mood,
        category: Some(category),
        hunger_level: HungerLevel::Light,
        preference: Preference::Healthy,
        meal_time: None,
        is_vegetarian: false,
        allergen_tags: BTreeSet::new(),
        calories: None,
        protein_g: None,
        carbs_g: None,
        fat_g: None,
    }
}

/// Remembers every query it forwards.
pub struct RecordingCatalog<S> {
    inner: S,
    seen: Mutex<Vec<CatalogQuery>>,
}

impl<S> RecordingCatalog<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl<S: CatalogStore> CatalogStore for RecordingCatalog<S> {
    async fn find(&self, query: &CatalogQuery) -> Result<Vec<MealRecord>, StoreError> {
        self.seen.lock().unwrap().push(query.clone());
        self.inner.find(query).await
    }
}

pub struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn find(&self, _query: &CatalogQuery) -> Result<Vec<MealRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
