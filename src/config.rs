//! 目录配置
//!
//! 默认使用平台数据目录（或便携模式下可执行文件旁的 resources 目录）中的 SQLite 文件，
//! 可通过环境变量覆盖。

use std::path::PathBuf;
use std::time::Duration;

use crate::database::connection::{sqlite_path_from_url, sqlite_url_for_path};
use crate::error::CatalogError;
use crate::utils::logs::LogLevel;

pub const ENV_DATABASE_URL: &str = "GAME_CATALOG_DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "GAME_CATALOG_MAX_CONNECTIONS";
pub const ENV_OPERATION_TIMEOUT_MS: &str = "GAME_CATALOG_OPERATION_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "GAME_CATALOG_LOG_LEVEL";

/// 内存数据库的连接在回收后会变成一个空的新库，因此给它一个足够长的寿命
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// SeaORM 连接字符串
    pub database_url: String,
    /// 本地数据库文件路径，内存数据库为 None
    pub database_path: Option<PathBuf>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sqlx_logging: bool,
    /// 空闲连接的回收时间，None 使用连接池默认值
    pub idle_timeout: Option<Duration>,
    /// 连接的最长寿命，None 使用连接池默认值
    pub max_lifetime: Option<Duration>,
    /// 单个目录操作的时限，None 表示不限制
    pub operation_timeout: Option<Duration>,
    /// 打开目录时设置的日志级别，None 表示保持当前级别
    pub log_level: Option<LogLevel>,
}

impl CatalogConfig {
    /// 使用指定的 SQLite 文件
    pub fn for_path(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let database_url =
            sqlite_url_for_path(&path).map_err(|e| CatalogError::Config(e.to_string()))?;
        Ok(Self::file_defaults(database_url, path))
    }

    /// 使用 SeaORM 连接字符串；sqlite 文件 URL 会解析出文件路径，以便创建所在目录
    pub fn for_url(url: &str) -> Self {
        let url = url.trim();
        match sqlite_path_from_url(url) {
            Some(path) => Self::file_defaults(url.to_string(), path),
            None => Self {
                database_url: url.to_string(),
                ..Self::in_memory()
            },
        }
    }

    fn file_defaults(database_url: String, path: PathBuf) -> Self {
        Self {
            database_url,
            database_path: Some(path),
            idle_timeout: None,
            max_lifetime: None,
            ..Self::in_memory()
        }
    }

    /// 使用平台数据目录下的默认数据库文件
    pub fn from_data_dir() -> Result<Self, CatalogError> {
        let path = catalog_path::get_db_path().map_err(CatalogError::Config)?;
        Self::for_path(path)
    }

    /// 内存数据库，连接池大小固定为 1，保证所有查询落在同一个数据库上
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_path: None,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(8),
            sqlx_logging: false,
            idle_timeout: Some(IN_MEMORY_CONNECTION_LIFETIME),
            max_lifetime: Some(IN_MEMORY_CONNECTION_LIFETIME),
            operation_timeout: None,
            log_level: None,
        }
    }

    /// 以平台数据目录为默认值，读取环境变量覆盖
    pub fn from_env() -> Result<Self, CatalogError> {
        let mut config = match std::env::var(ENV_DATABASE_URL) {
            Ok(url) if !url.trim().is_empty() => Self::for_url(&url),
            _ => Self::from_data_dir()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            let max: u32 = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!("{} 不是有效的数字: {}", ENV_MAX_CONNECTIONS, raw))
            })?;
            if max == 0 {
                return Err(CatalogError::Config(format!(
                    "{} 必须大于 0",
                    ENV_MAX_CONNECTIONS
                )));
            }
            self.max_connections = max;
            self.min_connections = self.min_connections.min(max);
        }

        if let Some(raw) = lookup(ENV_OPERATION_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!(
                    "{} 不是有效的数字: {}",
                    ENV_OPERATION_TIMEOUT_MS, raw
                ))
            })?;
            self.operation_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.log_level = Some(raw.parse().map_err(CatalogError::Config)?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn in_memory_uses_single_connection() {
        let config = CatalogConfig::in_memory();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert!(config.database_path.is_none());
        assert_eq!(config.idle_timeout, Some(IN_MEMORY_CONNECTION_LIFETIME));
        assert_eq!(config.max_lifetime, Some(IN_MEMORY_CONNECTION_LIFETIME));
    }

    #[test]
    fn file_url_resolves_database_path() {
        let config = CatalogConfig::for_url("sqlite:/var/lib/catalog/data/catalog.db?mode=rwc");
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/catalog/data/catalog.db"))
        );
        assert_eq!(config.idle_timeout, None);
        assert_eq!(config.max_lifetime, None);

        let memory = CatalogConfig::for_url("sqlite::memory:");
        assert!(memory.database_path.is_none());
        assert_eq!(memory.max_connections, 1);
    }

    #[test]
    fn overrides_are_applied() {
        let mut config = CatalogConfig::in_memory();
        config
            .apply_overrides(overrides(&[
                (ENV_MAX_CONNECTIONS, "4"),
                (ENV_OPERATION_TIMEOUT_MS, "250"),
                (ENV_LOG_LEVEL, "debug"),
            ]))
            .unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.operation_timeout, Some(Duration::from_millis(250)));
        assert!(matches!(config.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let mut config = CatalogConfig::in_memory();
        config.operation_timeout = Some(Duration::from_secs(1));
        config
            .apply_overrides(overrides(&[(ENV_OPERATION_TIMEOUT_MS, "0")]))
            .unwrap();
        assert_eq!(config.operation_timeout, None);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = CatalogConfig::in_memory();
        let err = config
            .apply_overrides(overrides(&[(ENV_MAX_CONNECTIONS, "many")]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn file_config_builds_sqlite_url() {
        let dir = std::env::temp_dir().join("game-catalog-config-test");
        let config = CatalogConfig::for_path(dir.join("catalog.db")).unwrap();
        assert!(config.database_url.starts_with("sqlite:"));
        assert!(config.database_url.ends_with("catalog.db?mode=rwc"));
        assert_eq!(config.idle_timeout, None);

        let reparsed = CatalogConfig::for_url(&config.database_url);
        assert_eq!(reparsed.database_path, config.database_path);
    }
}
