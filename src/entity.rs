//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义和 JSON 数据结构。

pub mod prelude;

// === JSON 数据结构（嵌入 games 表的 Text 列）===
pub mod name_list;

// === 枚举 ===
pub mod game_status;

// === SeaORM 实体（对应数据库表）===
pub mod games;
pub mod profiles;
pub mod user_games;
