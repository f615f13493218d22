use axum::{Router, routing::get};

use crate::{AppState, middleware::log_errors};

pub mod ping;
pub mod repos;

/// 组装全部路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/repos/{username}", get(repos::get_repo_count))
        .route("/ping", get(ping::ping))
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
