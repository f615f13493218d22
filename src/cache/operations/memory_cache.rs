use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use crate::cache::{RepoCountCache, decode_count, encode_count};

/// 默认最多保留的条目数
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    raw: String,
    ttl: Duration,
}

/// 每个条目按写入时给定的 TTL 过期，覆盖写入时重新计时
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 进程内缓存，语义与 Redis 的 GET / SETEX 一致
pub struct MemoryRepoCache {
    entries: Cache<String, Entry>,
}

impl MemoryRepoCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }

    /// 处理完挂起的淘汰任务后的条目数
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MemoryRepoCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepoCountCache for MemoryRepoCache {
    async fn get(&self, key: &str) -> Option<u64> {
        let entry = self.entries.get(key).await?;

        match decode_count(&entry.raw) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!("Ignoring cached value for {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, count: u64, ttl_secs: u64) {
        let entry = Entry {
            raw: encode_count(count),
            ttl: Duration::from_secs(ttl_secs),
        };
        self.entries.insert(key.to_string(), entry).await;
    }
}
