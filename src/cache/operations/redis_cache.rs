use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};
use tokio::sync::RwLock;

use crate::cache::{CacheError, RepoCountCache, decode_count, encode_count};

/// 基于 Redis 的仓库数量缓存
///
/// 连接在第一次使用时建立并复用，出错后丢弃，下次请求重新连接。
/// 建立连接时不持有锁，一个请求的连接失败不会阻塞其他请求。
pub struct RedisRepoCache {
    client: RedisClient,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisRepoCache {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            conn: RwLock::new(None),
        }
    }

    /// 只解析地址，不会立即连接
    pub fn open(redis_url: &str) -> Result<Self, CacheError> {
        Ok(Self::new(RedisClient::open(redis_url)?))
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        tracing::debug!("Opened Redis connection");

        // 并发建立的连接以先存入的为准
        let mut guard = self.conn.write().await;
        Ok(guard.get_or_insert(conn).clone())
    }

    async fn reset_on_failure(&self, err: &CacheError) {
        if matches!(err, CacheError::Redis(_)) {
            *self.conn.write().await = None;
        }
    }

    async fn try_get(&self, key: &str) -> Result<Option<u64>, CacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        raw.as_deref().map(decode_count).transpose()
    }

    async fn try_set(&self, key: &str, count: u64, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, encode_count(count), ttl_secs).await?;
        Ok(())
    }
}

#[async_trait]
impl RepoCountCache for RedisRepoCache {
    async fn get(&self, key: &str) -> Option<u64> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache read failed for {}, treating as miss: {}", key, e);
                self.reset_on_failure(&e).await;
                None
            }
        }
    }

    async fn set(&self, key: &str, count: u64, ttl_secs: u64) {
        if let Err(e) = self.try_set(key, count, ttl_secs).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
            self.reset_on_failure(&e).await;
        }
    }
}
