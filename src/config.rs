use std::path::PathBuf;

use crate::meals::resolver::FallbackPolicy;

/// Where meal records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendConfig {
    /// Meals shown per category when the request sets no limit.
    pub max_per_category: usize,
    /// Ceiling for a per-request limit.
    pub max_limit_override: usize,
    pub mood_only_fallback: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_per_category: 6,
            max_limit_override: 24,
            mood_only_fallback: true,
        }
    }
}

impl RecommendConfig {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            mood_only_fallback: self.mood_only_fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogSource,
    pub recommend: RecommendConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog = match (var("DATABASE_URL"), var("CATALOG_FILE")) {
            (Some(database_url), _) if !database_url.trim().is_empty() => CatalogSource::Postgres {
                database_url,
                max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10u32).max(1),
            },
            (_, Some(path)) if !path.trim().is_empty() => CatalogSource::File(PathBuf::from(path)),
            _ => anyhow::bail!("either DATABASE_URL or CATALOG_FILE must be set"),
        };

        let defaults = RecommendConfig::default();
        let recommend = RecommendConfig {
            max_per_category: parse_or(&var, "MAX_PER_CATEGORY", defaults.max_per_category).max(1),
            max_limit_override: parse_or(&var, "MAX_LIMIT_OVERRIDE", defaults.max_limit_override)
                .max(1),
            mood_only_fallback: var("FALLBACK_MOOD_ONLY")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.mood_only_fallback),
        };

        Ok(Self { catalog, recommend })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    var(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
