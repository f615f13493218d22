use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    AppState,
    cache::keys::repo_count_key,
    error::AppError,
    github::Resolution,
};

use super::model::RepoCountPage;

/// 先查缓存，未命中或缓存不可用时查询 GitHub 并回写缓存
#[axum::debug_handler]
pub async fn get_repo_count(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Html<String>, AppError> {
    let key = repo_count_key(&username);

    if let Some(count) = state.cache.get(&key).await {
        tracing::info!("Cache hit for {}", username);
        return Ok(RepoCountPage {
            username: &username,
            count,
        }
        .render());
    }

    tracing::info!("Cache miss for {}, querying GitHub", username);
    match state.resolver.resolve(&username).await {
        Resolution::Found(count) => {
            // 回写失败不影响响应
            state
                .cache
                .set(&key, count, state.config.cache_ttl_secs)
                .await;
            Ok(RepoCountPage {
                username: &username,
                count,
            }
            .render())
        }
        Resolution::NotFound => Err(AppError::UserNotFound(username)),
        Resolution::UpstreamError => Err(AppError::InternalServerError),
    }
}
