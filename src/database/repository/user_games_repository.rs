//! 用户游戏条目仓库
//!
//! (user_id, game_id) 为复合主键，写入统一走 ON CONFLICT 更新，
//! 冲突时只覆盖可变字段和 updated_at，created_at 保持首次写入的值。

use std::collections::HashSet;

use crate::database::dto::NormalizedAnnotation;
use crate::entity::prelude::*;
use crate::entity::{games, user_games};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

pub struct UserGamesRepository;

impl UserGamesRepository {
    // ==================== 写操作 ====================

    /// 插入或更新用户条目
    pub async fn upsert<C>(
        db: &C,
        user_id: &str,
        game_id: i64,
        annotation: NormalizedAnnotation,
        now: i64,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let entry = user_games::ActiveModel {
            user_id: Set(user_id.to_string()),
            game_id: Set(game_id),
            status: Set(annotation.status),
            rating: Set(annotation.rating),
            is_favorite: Set(annotation.is_favorite),
            comment: Set(annotation.comment),
            created_at: Set(now),
            updated_at: Set(now),
        };

        UserGames::insert(entry)
            .on_conflict(
                OnConflict::columns([user_games::Column::UserId, user_games::Column::GameId])
                    .update_columns([
                        user_games::Column::Status,
                        user_games::Column::Rating,
                        user_games::Column::IsFavorite,
                        user_games::Column::Comment,
                        user_games::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    /// 删除用户条目，条目不存在时影响行数为 0
    pub async fn delete<C>(db: &C, user_id: &str, game_id: i64) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        UserGames::delete_by_id((user_id.to_string(), game_id))
            .exec(db)
            .await
    }

    // ==================== 查询操作 ====================

    /// 点查询
    pub async fn find<C>(
        db: &C,
        user_id: &str,
        game_id: i64,
    ) -> Result<Option<user_games::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserGames::find_by_id((user_id.to_string(), game_id))
            .one(db)
            .await
    }

    /// 获取用户的所有条目（附带游戏数据），按 updated_at 倒序
    pub async fn find_by_user<C>(
        db: &C,
        user_id: &str,
        status: Option<GameStatus>,
    ) -> Result<Vec<(user_games::Model, Option<games::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = UserGames::find().filter(user_games::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(user_games::Column::Status.eq(status));
        }

        query
            .find_also_related(Games)
            .order_by_desc(user_games::Column::UpdatedAt)
            .order_by_asc(user_games::Column::GameId)
            .all(db)
            .await
    }

    /// 获取用户库中所有游戏 ID
    pub async fn game_ids_by_user<C>(db: &C, user_id: &str) -> Result<HashSet<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<i64> = UserGames::find()
            .select_only()
            .column(user_games::Column::GameId)
            .filter(user_games::Column::UserId.eq(user_id))
            .into_tuple()
            .all(db)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// 统计用户条目数量，可按状态筛选
    pub async fn count_by_user<C>(
        db: &C,
        user_id: &str,
        status: Option<GameStatus>,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = UserGames::find().filter(user_games::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(user_games::Column::Status.eq(status));
        }

        query.count(db).await
    }
}
