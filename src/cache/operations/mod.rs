/// 缓存后端实现
pub mod memory_cache;
pub mod redis_cache;

pub use memory_cache::MemoryRepoCache;
pub use redis_cache::RedisRepoCache;
