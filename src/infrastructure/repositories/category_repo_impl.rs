// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::{Category, Subcategory};
use crate::domain::models::user::UserRole;
use crate::domain::repositories::category_repository::CategoryRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    category as category_entity, subcategory as subcategory_entity, user as user_entity,
    user_category,
};
use crate::infrastructure::repositories::user_repo_impl::role_to_db;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use std::sync::Arc;

/// 类别仓库实现
///
/// 目录只读，不提供写操作
#[derive(Clone)]
pub struct CategoryRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<subcategory_entity::Model> for Subcategory {
    fn from(model: subcategory_entity::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

fn to_category(
    model: category_entity::Model,
    subcategories: Vec<subcategory_entity::Model>,
) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        subcategories: subcategories.into_iter().map(Into::into).collect(),
    }
}

/// 类别下角色为坐席的用户ID，按ID升序
///
/// 接受任意连接，工单创建时在事务内调用。
pub(crate) async fn eligible_agents<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
) -> Result<Vec<i32>, DbErr> {
    user_category::Entity::find()
        .select_only()
        .column(user_category::Column::UserId)
        .inner_join(user_entity::Entity)
        .filter(user_category::Column::CategoryId.eq(category_id))
        .filter(user_entity::Column::Role.eq(role_to_db(UserRole::Agent)))
        .order_by_asc(user_category::Column::UserId)
        .into_tuple::<i32>()
        .all(conn)
        .await
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn exists(&self, id: i32) -> Result<bool, RepositoryError> {
        let count = category_entity::Entity::find_by_id(id)
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn subcategory_belongs(
        &self,
        subcategory_id: i32,
        category_id: i32,
    ) -> Result<bool, RepositoryError> {
        let count = subcategory_entity::Entity::find()
            .filter(subcategory_entity::Column::Id.eq(subcategory_id))
            .filter(subcategory_entity::Column::CategoryId.eq(category_id))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn list_agents_for_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<i32>, RepositoryError> {
        Ok(eligible_agents(self.db.as_ref(), category_id).await?)
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = category_entity::Entity::find()
            .order_by_asc(category_entity::Column::Id)
            .find_with_related(subcategory_entity::Entity)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(category, subs)| to_category(category, subs))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError> {
        let rows = category_entity::Entity::find_by_id(id)
            .find_with_related(subcategory_entity::Entity)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .next()
            .map(|(category, subs)| to_category(category, subs)))
    }
}
