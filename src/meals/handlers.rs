use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    meals::{
        domain::{Labeled, Mood},
        dto::{MoodItem, RecommendRequest, RecommendResponse},
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/recommend", post(recommend_meals))
        .route("/moods", get(list_moods))
}

/// GET /meals?mood=&hungerLevel=&preference=&mealTime=&vegetarianOnly=&avoid=&seed=&limit=
///
/// `avoid` may repeat.
#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RecommendResponse>, AppError> {
    let req = RecommendRequest::from_query_pairs(pairs);
    Ok(Json(services::recommend(&state, &req).await?))
}

/// POST /meals/recommend with the same fields as a JSON body; `avoid` may be a list.
#[instrument(skip(state))]
pub async fn recommend_meals(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    Ok(Json(services::recommend(&state, &req).await?))
}

pub async fn list_moods() -> Json<Vec<MoodItem>> {
    Json(Mood::ALL.iter().map(|&name| MoodItem { name }).collect())
}
