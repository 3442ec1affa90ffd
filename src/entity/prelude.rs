//! 预导入模块
//!
//! 提供常用类型的快捷导入。

// === SeaORM 实体 ===
pub use super::games::Entity as Games;
pub use super::profiles::Entity as Profiles;
pub use super::user_games::Entity as UserGames;

pub use super::game_status::GameStatus;
