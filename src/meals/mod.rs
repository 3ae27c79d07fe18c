pub mod catalog;
pub mod domain;
mod dto;
pub mod handlers;
pub mod normalize;
pub mod query;
pub mod repo;
mod repo_types;
pub mod resolver;
pub mod services;
pub mod shaper;
#[cfg(test)]
pub(crate) mod test_support;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
