//! 数据传输对象 (DTO)
//!
//! 外部元数据源的游戏记录、用户标注以及返回给调用方的组合结构。

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::game_status::GameStatus;
use crate::entity::name_list::NameList;
use crate::entity::{games, user_games};
use crate::error::CatalogError;

/// 辅助函数：支持 Option<Option<T>> 的反序列化
/// 用于区分"未提供字段"和"显式设为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// 外部对象中仅需要名称的引用（genre / developer / publisher）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// 平台条目，名称嵌套在 platform 字段中
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: NamedRef,
}

/// 外部元数据源返回的游戏记录
///
/// 只有 `id` 是必需的；缺失的标量字段为 None，缺失的列表字段投影为空列表。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExternalGame {
    pub id: i64,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub background_image: Option<String>,
    pub released: Option<NaiveDate>,
    pub platforms: Option<Vec<PlatformEntry>>,
    pub genres: Option<Vec<NamedRef>>,
    pub developers: Option<Vec<NamedRef>>,
    pub publishers: Option<Vec<NamedRef>>,
    pub metacritic: Option<i32>,
}

impl ExternalGame {
    /// 从元数据源的 JSON 响应解析
    pub fn from_json(value: serde_json::Value) -> Result<Self, CatalogError> {
        serde_json::from_value(value)
            .map_err(|e| CatalogError::InvalidInput(format!("无法解析外部游戏记录: {}", e)))
    }

    /// 投影为 games 表的一行
    pub fn to_model(&self, created_at: i64) -> games::Model {
        games::Model {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            cover_image: self.background_image.clone(),
            release_date: self.released,
            platforms: project_names(self.platforms.as_deref(), |p| &p.platform.name),
            genres: project_names(self.genres.as_deref(), |g| &g.name),
            developers: project_names(self.developers.as_deref(), |d| &d.name),
            publishers: project_names(self.publishers.as_deref(), |p| &p.name),
            // 元数据源用 0 表示没有评分
            metacritic: self.metacritic.filter(|score| *score != 0),
            created_at,
        }
    }
}

fn project_names<T, F>(items: Option<&[T]>, name: F) -> NameList
where
    F: Fn(&T) -> &String,
{
    items
        .unwrap_or_default()
        .iter()
        .map(|item| name(item).clone())
        .collect()
}

/// 用户对游戏的标注（调用方输入，所有字段可缺省）
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub status: Option<GameStatus>,
    pub rating: Option<i32>,
    pub is_favorite: Option<bool>,
    pub comment: Option<String>,
}

/// 应用默认值并校验后的标注
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAnnotation {
    pub status: GameStatus,
    pub rating: Option<i32>,
    pub is_favorite: bool,
    pub comment: Option<String>,
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

impl Annotation {
    /// 状态默认为 wishlist，收藏默认为 false；
    /// 评分 0 与空评论视为未填写，其余超出 1–5 的评分被拒绝
    pub fn normalize(self) -> Result<NormalizedAnnotation, CatalogError> {
        let rating = match self.rating {
            None | Some(0) => None,
            Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Some(r),
            Some(r) => {
                return Err(CatalogError::InvalidInput(format!(
                    "评分必须在 {} 到 {} 之间: {}",
                    MIN_RATING, MAX_RATING, r
                )));
            }
        };

        Ok(NormalizedAnnotation {
            status: self.status.unwrap_or_default(),
            rating,
            is_favorite: self.is_favorite.unwrap_or(false),
            comment: self.comment.filter(|c| !c.is_empty()),
        })
    }
}

/// 用户库中的一条记录及其对应的共享游戏数据
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub entry: user_games::Model,
    pub game: Option<games::Model>,
}

/// 用户游戏数量统计
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub playing: u64,
    pub completed: u64,
    pub abandoned: u64,
    pub wishlist: u64,
}

impl UserStats {
    pub fn record(&mut self, status: GameStatus, count: u64) {
        match status {
            GameStatus::Playing => self.playing = count,
            GameStatus::Completed => self.completed = count,
            GameStatus::Abandoned => self.abandoned = count,
            GameStatus::Wishlist => self.wishlist = count,
        }
    }
}

/// 用于更新用户资料的数据结构
///
/// 所有字段均为 Option，允许部分更新。
/// 使用 Option<Option<T>> 来区分"未提供"和"设为 null"。
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileData {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projects_external_record() {
        let game = ExternalGame::from_json(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "slug": "grand-theft-auto-v",
            "background_image": "https://media.example/gta5.jpg",
            "released": "2013-09-17",
            "platforms": [
                {"platform": {"id": 4, "name": "PC"}},
                {"platform": {"id": 187, "name": "PlayStation 5"}}
            ],
            "genres": [{"id": 4, "name": "Action"}],
            "developers": [{"name": "Rockstar North"}],
            "metacritic": 92,
            "rating": 4.47
        }))
        .unwrap();

        let model = game.to_model(1_000);
        assert_eq!(model.id, 3498);
        assert_eq!(model.cover_image.as_deref(), Some("https://media.example/gta5.jpg"));
        assert_eq!(model.release_date, NaiveDate::from_ymd_opt(2013, 9, 17));
        assert_eq!(model.platforms.0, vec!["PC", "PlayStation 5"]);
        assert_eq!(model.genres.0, vec!["Action"]);
        assert_eq!(model.developers.0, vec!["Rockstar North"]);
        assert!(model.publishers.is_empty());
        assert_eq!(model.metacritic, Some(92));
        assert_eq!(model.created_at, 1_000);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let game = ExternalGame::from_json(json!({ "id": 7, "metacritic": 0 })).unwrap();
        let model = game.to_model(0);
        assert_eq!(model.name, None);
        assert_eq!(model.release_date, None);
        assert!(model.platforms.is_empty());
        assert_eq!(model.metacritic, None);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let err = ExternalGame::from_json(json!({ "name": "No id" })).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }

    #[test]
    fn annotation_defaults() {
        let normalized = Annotation::default().normalize().unwrap();
        assert_eq!(
            normalized,
            NormalizedAnnotation {
                status: GameStatus::Wishlist,
                rating: None,
                is_favorite: false,
                comment: None,
            }
        );
    }

    #[test]
    fn zero_rating_and_empty_comment_become_null() {
        let normalized = Annotation {
            status: Some(GameStatus::Completed),
            rating: Some(0),
            is_favorite: Some(true),
            comment: Some(String::new()),
        }
        .normalize()
        .unwrap();
        assert_eq!(normalized.rating, None);
        assert_eq!(normalized.comment, None);
        assert!(normalized.is_favorite);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        for rating in [-1, 6, 10] {
            let result = Annotation {
                rating: Some(rating),
                ..Default::default()
            }
            .normalize();
            assert!(matches!(result, Err(CatalogError::InvalidInput(_))));
        }
    }

    #[test]
    fn profile_update_distinguishes_null_from_missing() {
        let update: UpdateProfileData =
            serde_json::from_value(json!({ "avatar_url": null, "name": "Ana" })).unwrap();
        assert_eq!(update.name.as_deref(), Some("Ana"));
        assert_eq!(update.avatar_url, Some(None));
        assert_eq!(update.bio, None);
    }
}
