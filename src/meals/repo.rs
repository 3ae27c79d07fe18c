use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::StoreError;
use crate::meals::catalog::CatalogStore;
use crate::meals::domain::{Labeled, MealRecord};
use crate::meals::query::CatalogQuery;
use crate::meals::repo_types::MealRow;

const SELECT_MEALS: &str = r#"
    SELECT id, name, description, mood, category, hunger_level, preference,
           meal_time, is_vegetarian, allergen_tags, calories, protein_g, carbs_g, fat_g
      FROM meals
     WHERE mood = "#;

/// Catalog backed by the `meals` table.
#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Builds the WHERE clause for one query. Every value is bound, never inlined.
pub fn build_find_query(query: &CatalogQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(SELECT_MEALS);
    qb.push_bind(query.mood.as_str());

    if let Some(hunger) = query.hunger_level {
        qb.push(" AND hunger_level = ").push_bind(hunger.as_str());
    }
    if let Some(preference) = query.preference {
        qb.push(" AND preference = ").push_bind(preference.as_str());
    }
    if let Some(meal_time) = query.meal_time {
        qb.push(" AND meal_time = ").push_bind(meal_time.as_str());
    }
    if query.vegetarian_only {
        qb.push(" AND is_vegetarian = TRUE");
    }
    if !query.exclude_allergens.is_empty() {
        let tags: Vec<String> = query
            .exclude_allergens
            .iter()
            .map(|a| a.as_str().to_string())
            .collect();
        qb.push(" AND NOT (allergen_tags && ")
            .push_bind(tags)
            .push("::text[])");
    }
    qb
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn find(&self, query: &CatalogQuery) -> Result<Vec<MealRecord>, StoreError> {
        let rows = build_find_query(query)
            .build_query_as::<MealRow>()
            .fetch_all(&self.db)
            .await?;
        rows.into_iter().map(MealRecord::try_from).collect()
    }
}
