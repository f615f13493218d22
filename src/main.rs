use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use repocount::{
    AppState,
    cache::{MemoryRepoCache, RedisRepoCache, RepoCountCache},
    config::{CacheBackend, Config},
    github::GitHubClient,
    routes,
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置缓存，Redis 连接在第一次请求时建立
    let cache: Arc<dyn RepoCountCache> = match config.cache_backend {
        CacheBackend::Redis => {
            tracing::info!("Using Redis cache at {}", config.redis_url);
            Arc::new(RedisRepoCache::open(&config.redis_url).expect("Failed to create Redis client"))
        }
        CacheBackend::Memory => {
            tracing::info!(
                "Using in-process cache with up to {} entries",
                config.cache_max_entries
            );
            Arc::new(MemoryRepoCache::with_capacity(config.cache_max_entries))
        }
    };

    // 设置 GitHub 客户端
    let resolver =
        Arc::new(GitHubClient::from_config(&config).expect("Failed to create GitHub client"));

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        cache,
        resolver,
    };

    let router = routes::router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
