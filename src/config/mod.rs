use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SERVER_HOST: &str = "::";
const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_GITHUB_USER_AGENT: &str = "repocount";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// 缓存后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
    pub github_api_base: String,
    pub github_user_agent: String,
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cache_backend: CacheBackend::Redis,
            redis_url: format!("redis://{}:{}", DEFAULT_REDIS_HOST, DEFAULT_REDIS_PORT),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            github_user_agent: DEFAULT_GITHUB_USER_AGENT.to_string(),
            upstream_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 从任意键值来源读取配置，未设置的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let cache_backend = match lookup("CACHE_BACKEND") {
            None => defaults.cache_backend,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "redis" => CacheBackend::Redis,
                "memory" => CacheBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "CACHE_BACKEND",
                        value,
                    });
                }
            },
        };

        // REDIS_URL 优先，否则由 REDIS_HOST / REDIS_PORT 拼接
        let redis_url = match lookup("REDIS_URL") {
            Some(url) => url,
            None => {
                let host = lookup("REDIS_HOST").unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string());
                let port: u16 = parse_or(&lookup, "REDIS_PORT", DEFAULT_REDIS_PORT)?;
                format!("redis://{}:{}", host, port)
            }
        };

        let cache_ttl_secs = parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs)?;
        if cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECS",
                value: "0".to_string(),
            });
        }

        // 仅对进程内缓存生效
        let cache_max_entries =
            parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries)?;
        if cache_max_entries == 0 {
            return Err(ConfigError::Invalid {
                name: "CACHE_MAX_ENTRIES",
                value: "0".to_string(),
            });
        }

        let upstream_timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            None => None,
            Some(_) => Some(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 0u64)?),
        };

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            cache_backend,
            redis_url,
            cache_ttl_secs,
            cache_max_entries,
            github_api_base: lookup("GITHUB_API_BASE").unwrap_or(defaults.github_api_base),
            github_user_agent: lookup("GITHUB_USER_AGENT").unwrap_or(defaults.github_user_agent),
            upstream_timeout_secs,
        })
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
