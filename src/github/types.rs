use serde::Deserialize;

/// `GET /users/{username}` 响应中用到的字段
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub public_repos: Option<u64>,
}
