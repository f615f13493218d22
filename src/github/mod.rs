// GitHub 上游查询
// 只调用一次 /users/{username}，不重试

mod client;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GitHubClient;
pub use types::GitHubUser;

/// 单次查询的结果，不会被持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found(u64),
    NotFound,
    UpstreamError,
}

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub responded with unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("invalid GitHub API base url: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait RepoResolver: Send + Sync {
    async fn resolve(&self, username: &str) -> Resolution;
}
