use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::meals::catalog::CatalogStore;
use crate::meals::domain::{MealRecord, QueryFilters};
use crate::meals::query::{CatalogQuery, Relaxation, FALLBACK_ORDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Whether the chain may end in a query on mood alone.
    pub mood_only_fallback: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            mood_only_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub records: Vec<MealRecord>,
    /// Filters dropped before `records` was produced, in drop order.
    pub relaxed: Vec<Relaxation>,
    /// Store round trips issued.
    pub queries: usize,
}

/// Runs the strict query, then drops filters in [`FALLBACK_ORDER`] until
/// something matches. Queries are issued one after another; an empty
/// `records` means the catalog has nothing reachable for this mood.
#[instrument(skip(store, filters), fields(mood = %filters.mood))]
pub async fn resolve(
    store: &dyn CatalogStore,
    filters: &QueryFilters,
    policy: FallbackPolicy,
) -> Result<Resolution, StoreError> {
    let mut query = CatalogQuery::strict(filters);
    let mut records = store.find(&query).await?;
    let mut relaxed = Vec::new();
    let mut queries = 1;

    if !records.is_empty() {
        debug!(count = records.len(), "strict query matched");
        return Ok(Resolution {
            records,
            relaxed,
            queries,
        });
    }

    for step in FALLBACK_ORDER {
        if !query.relax(step) {
            continue;
        }
        if query.is_mood_only() && !policy.mood_only_fallback {
            debug!(step = step.as_str(), "mood-only fallback disabled; stopping");
            break;
        }
        relaxed.push(step);

        records = store.find(&query).await?;
        queries += 1;
        debug!(step = step.as_str(), count = records.len(), "relaxed query");

        if !records.is_empty() {
            let dropped: Vec<&str> = relaxed.iter().map(|r| r.as_str()).collect();
            info!(?dropped, count = records.len(), "fallback matched");
            break;
        }
    }

    if records.is_empty() {
        info!(queries, "no meals for mood");
    }

    Ok(Resolution {
        records,
        relaxed,
        queries,
    })
}
