use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::CatalogConfig;

/// 将文件路径转换为 sqlite 连接 URL
pub fn sqlite_url_for_path(path: &Path) -> Result<String, DbErr> {
    // 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            path.display()
        )))
    })?;

    // sqlite 驱动期望 sqlite:path 形式，mode=rwc 在文件不存在时创建
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// 从 sqlite 连接 URL 中解析数据库文件路径，内存数据库返回 None
pub fn sqlite_path_from_url(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

    if path.is_empty() || path == ":memory:" || query.contains("mode=memory") {
        return None;
    }

    // 绝对路径可能经过百分号编码（由 sqlite_url_for_path 生成）
    if path.starts_with('/') {
        if let Some(decoded) = Url::parse(&format!("file://{}", path))
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return Some(decoded);
        }
    }
    Some(PathBuf::from(path))
}

/// 确保数据库目录存在
pub fn ensure_db_dir_exists(db_path: &Path) -> Result<(), String> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("无法创建数据库目录: {}", e))?;
    }
    Ok(())
}

/// Establish a SeaORM database connection.
pub async fn establish_connection(config: &CatalogConfig) -> Result<DatabaseConnection, DbErr> {
    // 1. 文件数据库需要先确保目录存在
    if let Some(path) = &config.database_path {
        ensure_db_dir_exists(path).map_err(|e| DbErr::Conn(RuntimeErr::Internal(e)))?;
    }

    // 2. 设置连接选项
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(config.sqlx_logging);
    if let Some(idle_timeout) = config.idle_timeout {
        options.idle_timeout(idle_timeout);
    }
    if let Some(max_lifetime) = config.max_lifetime {
        options.max_lifetime(max_lifetime);
    }

    log::debug!("Database connection string: {}", options.get_url());

    // 3. 连接数据库
    Database::connect(options).await
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_paths_from_urls() {
        assert_eq!(
            sqlite_path_from_url("sqlite:/tmp/catalog.db?mode=rwc"),
            Some(PathBuf::from("/tmp/catalog.db"))
        );
        assert_eq!(
            sqlite_path_from_url("sqlite:///tmp/my%20games/catalog.db"),
            Some(PathBuf::from("/tmp/my games/catalog.db"))
        );
        assert_eq!(
            sqlite_path_from_url("sqlite:data/catalog.db"),
            Some(PathBuf::from("data/catalog.db"))
        );
    }

    #[test]
    fn memory_and_foreign_urls_have_no_path() {
        assert_eq!(sqlite_path_from_url("sqlite::memory:"), None);
        assert_eq!(sqlite_path_from_url("sqlite:shared?mode=memory&cache=shared"), None);
        assert_eq!(sqlite_path_from_url("postgres://localhost/catalog"), None);
    }
}
