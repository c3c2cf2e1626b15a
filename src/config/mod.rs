use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::analysis::GeneratorConfig;
use crate::provider::{ProviderKind, ProviderRegistry};

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub api_server: ServerConfig,
    pub governor: GovernorConfig,
    pub cache: CacheConfig,
    pub stores: StoreConfig,
    pub generator: GeneratorConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Request pacing applied to analysis calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernorConfig {
    /// Minimum time between two task starts
    pub min_spacing: Duration,
    /// Maximum task starts within one `window`
    pub max_per_window: u32,
    pub window: Duration,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_millis(1000),
            max_per_window: 60,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL of the in-memory analysis cache
    pub analysis_ttl: Duration,
    pub analysis_max_entries: u64,
    /// TTL of the persisted provider response cache
    pub response_ttl: Duration,
    pub response_cache_enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            analysis_ttl: Duration::from_secs(5 * 60),
            analysis_max_entries: 1000,
            response_ttl: Duration::from_secs(60 * 60),
            response_cache_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub history_limit: usize,
    pub favorites_limit: usize,
    pub default_quota: u32,
    pub enforce_quota: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            favorites_limit: 25,
            default_quota: 5,
            enforce_quota: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider used when no preference has been stored
    pub default_provider: ProviderKind,
    pub registry: ProviderRegistry,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::Mock,
            registry: ProviderRegistry::default(),
        }
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "sqlite" => StorageBackend::Sqlite,
            "memory" => StorageBackend::Memory,
            other => {
                tracing::warn!(
                    "Unknown STORAGE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, memory"
                );
                StorageBackend::Sqlite
            }
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./kwscout.db".to_string());
        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env_or("API_PORT", 8080u16)?;

        let governor_defaults = GovernorConfig::default();
        let governor = GovernorConfig {
            min_spacing: Duration::from_millis(env_or(
                "RATE_LIMIT_DELAY_MS",
                governor_defaults.min_spacing.as_millis() as u64,
            )?),
            max_per_window: env_or("MAX_REQUESTS_PER_MINUTE", governor_defaults.max_per_window)?,
            window: governor_defaults.window,
        };

        let cache_defaults = CacheConfig::default();
        let cache = CacheConfig {
            analysis_ttl: Duration::from_secs(env_or(
                "ANALYSIS_CACHE_TTL_SECS",
                cache_defaults.analysis_ttl.as_secs(),
            )?),
            analysis_max_entries: env_or(
                "ANALYSIS_CACHE_MAX_ENTRIES",
                cache_defaults.analysis_max_entries,
            )?,
            response_ttl: Duration::from_secs(env_or(
                "RESPONSE_CACHE_TTL_SECS",
                cache_defaults.response_ttl.as_secs(),
            )?),
            response_cache_enabled: env_flag(
                "RESPONSE_CACHE_ENABLED",
                cache_defaults.response_cache_enabled,
            ),
        };

        let store_defaults = StoreConfig::default();
        let stores = StoreConfig {
            history_limit: env_or("HISTORY_LIMIT", store_defaults.history_limit)?,
            favorites_limit: env_or("FAVORITES_LIMIT", store_defaults.favorites_limit)?,
            default_quota: env_or("SEARCH_QUOTA", store_defaults.default_quota)?,
            enforce_quota: env_flag("ENFORCE_QUOTA", store_defaults.enforce_quota),
        };

        let default_provider = match std::env::var("DEFAULT_PROVIDER") {
            Ok(raw) => raw.parse::<ProviderKind>().unwrap_or_else(|_| {
                tracing::warn!("Unknown DEFAULT_PROVIDER '{raw}', falling back to 'mock'");
                ProviderKind::Mock
            }),
            Err(_) => ProviderKind::Mock,
        };

        Ok(Config {
            storage: StorageConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            governor,
            cache,
            stores,
            generator: GeneratorConfig::default(),
            provider: ProviderConfig {
                default_provider,
                registry: ProviderRegistry::from_env(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let governor = GovernorConfig::default();
        assert_eq!(governor.min_spacing, Duration::from_millis(1000));
        assert_eq!(governor.max_per_window, 60);

        let cache = CacheConfig::default();
        assert_eq!(cache.analysis_ttl, Duration::from_secs(300));
        assert_eq!(cache.response_ttl, Duration::from_secs(3600));

        let stores = StoreConfig::default();
        assert_eq!(stores.history_limit, 20);
        assert_eq!(stores.favorites_limit, 25);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("KWSCOUT_TEST_BAD_NUMBER", "twelve");
        assert!(env_or("KWSCOUT_TEST_BAD_NUMBER", 1u32).is_err());
        assert_eq!(env_or("KWSCOUT_TEST_UNSET_NUMBER", 7u32).unwrap(), 7);
    }
}
