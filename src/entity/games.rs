//! 游戏目录实体
//!
//! games 表是所有用户共享的游戏目录，主键为外部元数据源的游戏 ID。
//! 每个 ID 至多一行，首次保存时写入，之后不再被保存流程修改。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::name_list::NameList;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    // === 展示信息 ===
    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub slug: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_image: Option<String>,
    pub release_date: Option<Date>,

    // === JSON 列表列 ===
    #[sea_orm(column_type = "Text")]
    pub platforms: NameList,
    #[sea_orm(column_type = "Text")]
    pub genres: NameList,
    #[sea_orm(column_type = "Text")]
    pub developers: NameList,
    #[sea_orm(column_type = "Text")]
    pub publishers: NameList,

    pub metacritic: Option<i32>,

    // === 时间戳 ===
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_games::Entity")]
    UserGames,
}

impl Related<super::user_games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
