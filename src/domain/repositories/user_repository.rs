// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use crate::domain::repositories::ticket_repository::RepositoryError;
use async_trait::async_trait;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError>;
    /// 通过 API Key 的 SHA-256 十六进制摘要查找用户
    async fn find_by_api_key_hash(&self, key_hash: &str) -> Result<Option<User>, RepositoryError>;
}
