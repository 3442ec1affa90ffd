use crate::database::dto::UpdateProfileData;
use crate::entity::prelude::*;
use crate::entity::profiles;
use sea_orm::*;

/// 新用户的默认简介
pub const DEFAULT_BIO: &str = "Olá! Sou novo por aqui.";

/// 用户资料仓库
pub struct ProfilesRepository;

impl ProfilesRepository {
    /// 创建用户资料，名称默认取邮箱 @ 之前的部分
    pub async fn create<C>(
        db: &C,
        user_id: &str,
        email: &str,
        now: i64,
    ) -> Result<profiles::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let name = email.split('@').next().unwrap_or_default().to_string();

        let profile = profiles::ActiveModel {
            id: Set(user_id.to_string()),
            email: Set(email.to_string()),
            name: Set(name),
            avatar_url: Set(None),
            bio: Set(Some(DEFAULT_BIO.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        profile.insert(db).await
    }

    /// 根据用户 ID 查询资料
    pub async fn find_by_id<C>(db: &C, user_id: &str) -> Result<Option<profiles::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Profiles::find_by_id(user_id.to_string()).one(db).await
    }

    /// 部分更新用户资料，未提供的字段保持不变
    pub async fn update<C>(
        db: &C,
        user_id: &str,
        updates: UpdateProfileData,
        now: i64,
    ) -> Result<profiles::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let existing = Profiles::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

        let mut active: profiles::ActiveModel = existing.into();

        if let Some(name) = updates.name {
            active.name = Set(name);
        }
        if let Some(avatar_url) = updates.avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        if let Some(bio) = updates.bio {
            active.bio = Set(bio);
        }

        active.updated_at = Set(now);

        active.update(db).await
    }
}
