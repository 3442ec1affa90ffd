//! 目录同步服务
//!
//! `CatalogSync` 持有数据库连接，所有操作显式接收用户 ID。
//! 保存流程在单个事务中依次完成两次 upsert：
//! 1. games 表：不存在则插入，已存在保持不变
//! 2. user_games 表：插入或覆盖可变字段，保留 created_at

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::database::connection::close_connection;
use crate::database::dto::{
    Annotation, ExternalGame, LibraryEntry, UpdateProfileData, UserStats,
};
use crate::database::repository::{
    games_repository::GamesRepository, profiles_repository::ProfilesRepository,
    user_games_repository::UserGamesRepository,
};
use crate::entity::game_status::GameStatus;
use crate::entity::{games, profiles, user_games};
use crate::error::CatalogError;

/// 写操作的结果
///
/// 失败时携带可读的错误信息，以及该失败是否值得重试。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub retryable: bool,
}

impl SyncResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            retryable: false,
        }
    }

    pub fn failed(err: &CatalogError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            retryable: err.is_retryable(),
        }
    }
}

impl<T> From<Result<T, CatalogError>> for SyncResult {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(_) => SyncResult::ok(),
            Err(e) => SyncResult::failed(&e),
        }
    }
}

/// 当前时间（毫秒时间戳）
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn require_user_id(user_id: &str) -> Result<&str, CatalogError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidInput("用户 ID 不能为空".to_string()));
    }
    Ok(trimmed)
}

/// 游戏目录同步服务
pub struct CatalogSync {
    db: DatabaseConnection,
    operation_timeout: Option<Duration>,
}

impl CatalogSync {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            operation_timeout: None,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// 关闭数据库连接
    pub async fn close(self) -> Result<(), CatalogError> {
        close_connection(self.db).await?;
        log::info!("数据库连接已关闭");
        Ok(())
    }

    /// 在配置的时限内执行存储操作
    async fn run<T, F>(&self, op: F) -> Result<T, CatalogError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match self.operation_timeout {
            Some(limit) => match tokio::time::timeout(limit, op).await {
                Ok(result) => result.map_err(CatalogError::from),
                Err(_) => Err(CatalogError::TimedOut(limit.as_millis())),
            },
            None => op.await.map_err(CatalogError::from),
        }
    }

    // ==================== 用户游戏库 ====================

    /// 将游戏保存到用户的游戏库（新增或更新）
    pub async fn save_user_game(
        &self,
        user_id: &str,
        game: &ExternalGame,
        annotation: Annotation,
    ) -> SyncResult {
        let result = self.try_save_user_game(user_id, game, annotation).await;
        if let Err(e) = &result {
            log::error!("保存用户游戏失败: {}", e);
        }
        result.into()
    }

    /// 保存用户游戏，成功时返回写入后的条目
    pub async fn try_save_user_game(
        &self,
        user_id: &str,
        game: &ExternalGame,
        annotation: Annotation,
    ) -> Result<user_games::Model, CatalogError> {
        let user_id = require_user_id(user_id)?;
        let annotation = annotation.normalize()?;
        let game_id = game.id;

        let entry = self
            .run(async {
                let now = now_millis();
                let txn = self.db.begin().await?;

                let inserted = GamesRepository::insert_if_absent(&txn, game, now).await?;
                if inserted {
                    log::debug!("游戏 {} 已加入共享目录", game_id);
                }

                UserGamesRepository::upsert(&txn, user_id, game_id, annotation, now).await?;

                let entry = UserGamesRepository::find(&txn, user_id, game_id)
                    .await?
                    .ok_or_else(|| {
                        DbErr::RecordNotFound(format!("user_games ({}, {})", user_id, game_id))
                    })?;

                txn.commit().await?;
                Ok::<_, DbErr>(entry)
            })
            .await?;

        log::debug!(
            "用户 {} 的游戏 {} 已保存，状态: {}",
            user_id,
            game_id,
            entry.status
        );
        Ok(entry)
    }

    /// 从用户的游戏库中移除游戏，条目不存在时同样视为成功
    ///
    /// 共享的 games 行不会被删除。
    pub async fn remove_user_game(&self, user_id: &str, game_id: i64) -> SyncResult {
        let result = async {
            let user_id = require_user_id(user_id)?;
            let deleted = self
                .run(UserGamesRepository::delete(&self.db, user_id, game_id))
                .await?;
            log::debug!(
                "移除用户 {} 的游戏 {}，影响行数: {}",
                user_id,
                game_id,
                deleted.rows_affected
            );
            Ok::<_, CatalogError>(())
        }
        .await;

        if let Err(e) = &result {
            log::error!("移除用户游戏失败: {}", e);
        }
        result.into()
    }

    /// 获取用户的游戏库，可按状态筛选，最近更新的在前
    pub async fn list_user_games(
        &self,
        user_id: &str,
        status: Option<GameStatus>,
    ) -> Result<Vec<LibraryEntry>, CatalogError> {
        let user_id = require_user_id(user_id)?;
        let rows = self
            .run(UserGamesRepository::find_by_user(&self.db, user_id, status))
            .await?;

        Ok(rows
            .into_iter()
            .map(|(entry, game)| LibraryEntry { entry, game })
            .collect())
    }

    /// 按字符串筛选条件获取游戏库，"all" 或空字符串表示不筛选
    pub async fn list_user_games_filtered(
        &self,
        user_id: &str,
        filter: &str,
    ) -> Result<Vec<LibraryEntry>, CatalogError> {
        let status = match filter.trim() {
            "" => None,
            f if f.eq_ignore_ascii_case("all") => None,
            f => Some(f.parse::<GameStatus>().map_err(CatalogError::InvalidInput)?),
        };
        self.list_user_games(user_id, status).await
    }

    /// 查询用户的单个游戏条目，不存在时返回 None
    pub async fn get_user_game(
        &self,
        user_id: &str,
        game_id: i64,
    ) -> Result<Option<user_games::Model>, CatalogError> {
        let user_id = require_user_id(user_id)?;
        self.run(UserGamesRepository::find(&self.db, user_id, game_id))
            .await
    }

    /// 检查游戏是否已在用户的游戏库中
    pub async fn is_in_library(&self, user_id: &str, game_id: i64) -> Result<bool, CatalogError> {
        Ok(self.get_user_game(user_id, game_id).await?.is_some())
    }

    /// 获取用户游戏库中的所有游戏 ID，用于标记搜索结果
    pub async fn library_game_ids(&self, user_id: &str) -> Result<HashSet<i64>, CatalogError> {
        let user_id = require_user_id(user_id)?;
        self.run(UserGamesRepository::game_ids_by_user(&self.db, user_id))
            .await
    }

    /// 按状态统计用户的游戏数量
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, CatalogError> {
        use sea_orm::Iterable;

        let user_id = require_user_id(user_id)?;
        let mut stats = UserStats {
            total: self
                .run(UserGamesRepository::count_by_user(&self.db, user_id, None))
                .await?,
            ..Default::default()
        };

        for status in GameStatus::iter() {
            let count = self
                .run(UserGamesRepository::count_by_user(
                    &self.db,
                    user_id,
                    Some(status),
                ))
                .await?;
            stats.record(status, count);
        }

        Ok(stats)
    }

    // ==================== 共享目录 ====================

    /// 查询共享目录中的游戏
    pub async fn find_game(&self, game_id: i64) -> Result<Option<games::Model>, CatalogError> {
        self.run(GamesRepository::find_by_id(&self.db, game_id)).await
    }

    /// 共享目录中的游戏总数
    pub async fn count_games(&self) -> Result<u64, CatalogError> {
        self.run(GamesRepository::count(&self.db)).await
    }

    // ==================== 用户资料 ====================

    /// 注册后创建用户资料
    pub async fn create_profile(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<profiles::Model, CatalogError> {
        let user_id = require_user_id(user_id)?;
        if !email.contains('@') {
            return Err(CatalogError::InvalidInput(format!("无效的邮箱: {}", email)));
        }

        let profile = self
            .run(ProfilesRepository::create(
                &self.db,
                user_id,
                email,
                now_millis(),
            ))
            .await?;
        log::info!("已为用户 {} 创建资料", user_id);
        Ok(profile)
    }

    /// 查询用户资料
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<profiles::Model>, CatalogError> {
        let user_id = require_user_id(user_id)?;
        self.run(ProfilesRepository::find_by_id(&self.db, user_id))
            .await
    }

    /// 部分更新用户资料
    pub async fn update_profile(
        &self,
        user_id: &str,
        updates: UpdateProfileData,
    ) -> Result<profiles::Model, CatalogError> {
        let user_id = require_user_id(user_id)?;
        if matches!(updates.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(CatalogError::InvalidInput("名称不能为空".to_string()));
        }

        self.run(ProfilesRepository::update(
            &self.db,
            user_id,
            updates,
            now_millis(),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_result_carries_error_classification() {
        let ok: SyncResult = Ok::<_, CatalogError>(()).into();
        assert_eq!(ok, SyncResult::ok());

        let failed: SyncResult = Err::<(), _>(CatalogError::TimedOut(20)).into();
        assert!(!failed.success);
        assert!(failed.retryable);
        assert!(failed.error.unwrap().contains("20"));
    }

    #[test]
    fn blank_user_id_is_rejected() {
        assert!(require_user_id("   ").is_err());
        assert_eq!(require_user_id(" U1 ").unwrap(), "U1");
    }

    #[test]
    fn successful_result_omits_error_field() {
        let json = serde_json::to_value(SyncResult::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "retryable": false }));
    }
}
