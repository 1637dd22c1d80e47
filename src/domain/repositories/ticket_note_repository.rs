// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket_note::{NewTicketNote, TicketNote};
use crate::domain::repositories::ticket_repository::RepositoryError;
use async_trait::async_trait;

/// 工单备注仓库特质
#[async_trait]
pub trait TicketNoteRepository: Send + Sync {
    async fn create(&self, note: NewTicketNote) -> Result<TicketNote, RepositoryError>;
    /// 按创建顺序列出工单的备注
    async fn list_by_ticket(&self, ticket_id: i32) -> Result<Vec<TicketNote>, RepositoryError>;
}
