//! 个人游戏目录
//!
//! 共享的 games 目录表 + 按用户划分的 user_games 条目表，
//! 以及用户资料。入口为 [`open`]，返回持有数据库连接的 [`CatalogSync`]。

pub mod config;
pub mod database;
pub mod entity;
mod error;
pub mod utils;

pub use config::CatalogConfig;
pub use database::dto::{
    Annotation, ExternalGame, LibraryEntry, NamedRef, NormalizedAnnotation, PlatformEntry,
    UpdateProfileData, UserStats,
};
pub use database::service::{CatalogSync, SyncResult};
pub use entity::game_status::GameStatus;
pub use error::CatalogError;
pub use utils::logs::LogLevel;

use database::connection;
use migration::MigratorTrait;

/// 建立数据库连接、执行迁移并返回目录服务
pub async fn open(config: &CatalogConfig) -> Result<CatalogSync, CatalogError> {
    if let Some(level) = config.log_level {
        log::set_max_level(level.to_level_filter());
    }

    let conn = match connection::establish_connection(config).await {
        Ok(conn) => {
            log::info!("数据库连接建立成功");
            conn
        }
        Err(e) => {
            log::error!("无法建立数据库连接: {}", e);
            return Err(e.into());
        }
    };

    // 执行数据库迁移
    log::info!("开始执行数据库迁移...");
    if let Err(e) = migration::Migrator::up(&conn, None).await {
        log::error!("数据库迁移失败: {}", e);
        if let Err(close_err) = connection::close_connection(conn).await {
            log::warn!("关闭数据库连接时出错: {}", close_err);
        }
        return Err(CatalogError::Rejected(e));
    }
    log::info!("数据库迁移完成");

    Ok(CatalogSync::new(conn).with_operation_timeout(config.operation_timeout))
}
