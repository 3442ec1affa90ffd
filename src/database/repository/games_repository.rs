//! 共享游戏目录仓库
//!
//! games 表以外部 ID 为主键，插入使用 ON CONFLICT DO NOTHING，
//! 已存在的行保持不变（先写入者为准）。

use crate::database::dto::ExternalGame;
use crate::entity::games;
use crate::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

pub struct GamesRepository;

impl GamesRepository {
    /// 游戏不存在时插入，返回是否实际插入了新行
    pub async fn insert_if_absent<C>(
        db: &C,
        game: &ExternalGame,
        now: i64,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let model = game.to_model(now);

        let game_active = games::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            slug: Set(model.slug),
            cover_image: Set(model.cover_image),
            release_date: Set(model.release_date),
            platforms: Set(model.platforms),
            genres: Set(model.genres),
            developers: Set(model.developers),
            publishers: Set(model.publishers),
            metacritic: Set(model.metacritic),
            created_at: Set(model.created_at),
        };

        let rows = Games::insert(game_active)
            .on_conflict(
                OnConflict::column(games::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(rows > 0)
    }

    /// 根据 ID 查询游戏
    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<games::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find_by_id(id).one(db).await
    }

    /// 获取游戏总数
    pub async fn count<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Games::find().count(db).await
    }
}
