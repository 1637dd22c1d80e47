// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{User, UserRole};
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::{api_key, user as user_entity};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use std::sync::Arc;

/// 角色在 users.role 列中的取值
pub(crate) fn role_to_db(role: UserRole) -> &'static str {
    match role {
        UserRole::Requester => "user",
        UserRole::Agent => "agent",
        UserRole::Administrator => "admin",
    }
}

/// 用户仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user_entity::Model> for User {
    fn from(model: user_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role.parse().unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_api_key_hash(&self, key_hash: &str) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .inner_join(api_key::Entity)
            .filter(api_key::Column::KeyHash.eq(key_hash))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }
}
