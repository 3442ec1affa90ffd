//! 用户游戏条目实体
//!
//! 每个 (user_id, game_id) 至多一条记录，记录用户对游戏的状态、评分、收藏和评论。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::game_status::GameStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: i64,

    // === 用户标注 ===
    pub status: GameStatus,
    pub rating: Option<i32>,
    pub is_favorite: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,

    // === 时间戳（毫秒）===
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_delete = "Cascade"
    )]
    Games,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Games.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
