use std::sync::Arc;

use cache::RepoCountCache;
use config::Config;
use github::RepoResolver;

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod middleware;
pub mod routes;
pub mod utils;

/// 请求处理依赖的共享资源，启动时创建一次
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cache: Arc<dyn RepoCountCache>,
    pub resolver: Arc<dyn RepoResolver>,
}
