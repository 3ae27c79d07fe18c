use crate::config::{AppConfig, CatalogSource};
use crate::meals::catalog::{CatalogStore, InMemoryCatalog};
use crate::meals::repo::PgCatalog;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let catalog = match &config.catalog {
            CatalogSource::Postgres {
                database_url,
                max_connections,
            } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                tracing::info!("using postgres meal catalog");
                Arc::new(PgCatalog::new(db)) as Arc<dyn CatalogStore>
            }
            CatalogSource::File(path) => {
                let catalog = InMemoryCatalog::load_json(path).await?;
                if catalog.is_empty() {
                    tracing::warn!(path = %path.display(), "catalog file has no meals");
                }
                Arc::new(catalog) as Arc<dyn CatalogStore>
            }
        };

        Ok(Self::from_parts(config, catalog))
    }

    pub fn from_parts(config: Arc<AppConfig>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { config, catalog }
    }

    #[cfg(test)]
    pub fn fake(records: Vec<crate::meals::domain::MealRecord>) -> Self {
        let config = Arc::new(AppConfig {
            catalog: CatalogSource::File("fake.json".into()),
            recommend: crate::config::RecommendConfig::default(),
        });
        let catalog = InMemoryCatalog::new(records).expect("fake catalog is valid");
        Self::from_parts(config, Arc::new(catalog))
    }
}
