// 缓存模块
// 仓库数量的读写，所有失败都在本模块内吞掉，调用方只看到命中或未命中

pub mod keys;
pub mod operations;

use async_trait::async_trait;
use thiserror::Error;

pub use operations::{MemoryRepoCache, RedisRepoCache};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cached value is not a repository count: {0:?}")]
    Decode(String),
}

/// 仓库数量缓存
///
/// `get` 在任何底层错误时返回 `None`，`set` 失败只记录日志。
#[async_trait]
pub trait RepoCountCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<u64>;

    async fn set(&self, key: &str, count: u64, ttl_secs: u64);
}

/// 缓存中以十进制文本保存数量
pub fn encode_count(count: u64) -> String {
    count.to_string()
}

pub fn decode_count(raw: &str) -> Result<u64, CacheError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CacheError::Decode(raw.to_string()))
}
