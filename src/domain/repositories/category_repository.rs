// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::Category;
use crate::domain::repositories::ticket_repository::RepositoryError;
use async_trait::async_trait;

/// 类别目录仓库特质
///
/// 目录只读，坐席与类别的关联来自 `user_categories`。
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// 类别是否存在
    async fn exists(&self, id: i32) -> Result<bool, RepositoryError>;
    /// 子类别是否属于给定类别
    async fn subcategory_belongs(
        &self,
        subcategory_id: i32,
        category_id: i32,
    ) -> Result<bool, RepositoryError>;
    /// 类别下角色为坐席的用户ID，按ID升序
    async fn list_agents_for_category(&self, category_id: i32)
        -> Result<Vec<i32>, RepositoryError>;
    /// 列出全部类别及其子类别
    async fn list_all(&self) -> Result<Vec<Category>, RepositoryError>;
    /// 根据ID查找类别
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError>;
}
