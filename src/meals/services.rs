use tracing::{debug, instrument};

use crate::error::AppError;
use crate::meals::domain::QueryFilters;
use crate::meals::dto::{RecommendRequest, RecommendResponse};
use crate::meals::normalize::normalize;
use crate::meals::resolver::resolve;
use crate::meals::shaper::{shape, GroupedMeals};
use crate::state::AppState;

/// normalize → resolve → shape → assemble.
#[instrument(skip(state, req))]
pub async fn recommend(
    state: &AppState,
    req: &RecommendRequest,
) -> Result<RecommendResponse, AppError> {
    let cfg = &state.config.recommend;
    let params = normalize(req, cfg.max_limit_override)?;

    let resolution = resolve(
        state.catalog.as_ref(),
        &params.filters,
        cfg.fallback_policy(),
    )
    .await?;

    let count = resolution.records.len();
    let cap = params.limit.unwrap_or(cfg.max_per_category);
    let results = shape(resolution.records, params.seed.as_deref(), cap);
    let relaxed: Vec<&str> = resolution.relaxed.iter().map(|r| r.as_str()).collect();
    debug!(
        count,
        cap,
        ?relaxed,
        queries = resolution.queries,
        groups = results.len(),
        seeded = params.seed.is_some(),
        "recommendation shaped"
    );

    Ok(assemble(params.filters, results, count))
}

/// `count` is the pre-truncation total, not the number of meals shown.
pub fn assemble(filters: QueryFilters, results: GroupedMeals, count: usize) -> RecommendResponse {
    RecommendResponse {
        mood: filters.mood,
        filters,
        results,
        count,
    }
}
