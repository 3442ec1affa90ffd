//! 基线迁移
//!
//! 创建共享的 games 目录表和按用户划分的 user_games 表：
//! 1. games 以外部元数据源的游戏 ID 为主键，不自增
//! 2. user_games 以 (user_id, game_id) 为复合主键，保证每个用户每个游戏至多一条记录
//! 3. 为按状态筛选和按更新时间排序的查询建立索引

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. games 表，列表字段以 JSON 文本存储
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::Name).text().null())
                    .col(ColumnDef::new(Games::Slug).text().null())
                    .col(ColumnDef::new(Games::CoverImage).text().null())
                    .col(ColumnDef::new(Games::ReleaseDate).date().null())
                    .col(ColumnDef::new(Games::Platforms).text().not_null().default("[]"))
                    .col(ColumnDef::new(Games::Genres).text().not_null().default("[]"))
                    .col(ColumnDef::new(Games::Developers).text().not_null().default("[]"))
                    .col(ColumnDef::new(Games::Publishers).text().not_null().default("[]"))
                    .col(ColumnDef::new(Games::Metacritic).integer().null())
                    .col(ColumnDef::new(Games::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 2. user_games 表
        manager
            .create_table(
                Table::create()
                    .table(UserGames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserGames::UserId).text().not_null())
                    .col(ColumnDef::new(UserGames::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(UserGames::Status)
                            .text()
                            .not_null()
                            .default("wishlist"),
                    )
                    .col(ColumnDef::new(UserGames::Rating).integer().null())
                    .col(
                        ColumnDef::new(UserGames::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UserGames::Comment).text().null())
                    .col(ColumnDef::new(UserGames::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(UserGames::UpdatedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserGames::UserId)
                            .col(UserGames::GameId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_games_game_id")
                            .from(UserGames::Table, UserGames::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. 索引
        manager
            .create_index(
                Index::create()
                    .name("idx_user_games_user_status")
                    .table(UserGames::Table)
                    .col(UserGames::UserId)
                    .col(UserGames::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_games_user_updated")
                    .table(UserGames::Table)
                    .col(UserGames::UserId)
                    .col(UserGames::UpdatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserGames::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Name,
    Slug,
    CoverImage,
    ReleaseDate,
    Platforms,
    Genres,
    Developers,
    Publishers,
    Metacritic,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserGames {
    Table,
    UserId,
    GameId,
    Status,
    Rating,
    IsFavorite,
    Comment,
    CreatedAt,
    UpdatedAt,
}
