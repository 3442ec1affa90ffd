//! 用户游戏状态枚举
//!
//! 以小写字符串存入 user_games.status 列。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[sea_orm(string_value = "playing")]
    Playing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
    #[default]
    #[sea_orm(string_value = "wishlist")]
    Wishlist,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Completed => "completed",
            GameStatus::Abandoned => "abandoned",
            GameStatus::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "playing" => Ok(GameStatus::Playing),
            "completed" => Ok(GameStatus::Completed),
            "abandoned" => Ok(GameStatus::Abandoned),
            "wishlist" => Ok(GameStatus::Wishlist),
            other => Err(format!("无效的游戏状态: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Playing".parse::<GameStatus>(), Ok(GameStatus::Playing));
        assert_eq!("WISHLIST".parse::<GameStatus>(), Ok(GameStatus::Wishlist));
        assert!("finished".parse::<GameStatus>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&GameStatus::Abandoned).unwrap();
        assert_eq!(json, "\"abandoned\"");
    }
}
