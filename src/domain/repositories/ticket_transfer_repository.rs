// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket_transfer::{NewTransferRequest, TicketTransfer};
use crate::domain::repositories::ticket_repository::RepositoryError;
use async_trait::async_trait;

/// 转派请求仓库特质
#[async_trait]
pub trait TicketTransferRepository: Send + Sync {
    /// 以 Pending 状态创建转派请求
    async fn create(&self, request: NewTransferRequest) -> Result<TicketTransfer, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<TicketTransfer>, RepositoryError>;

    /// 列出转派请求
    ///
    /// `agent_id` 不为空时只返回该坐席作为来源或目标的请求。
    async fn list(&self, agent_id: Option<i32>) -> Result<Vec<TicketTransfer>, RepositoryError>;

    /// 批准请求并改派工单
    ///
    /// 同一事务内完成：请求 Pending → Approved，工单坐席改为目标坐席
    /// （Open 工单同时变为 Assigned）。请求已不是 Pending，或工单坐席
    /// 已不是 `from_agent_id` 时返回 `Conflict`。
    async fn approve(&self, id: i32, admin_id: i32) -> Result<TicketTransfer, RepositoryError>;

    /// 驳回请求，请求已不是 Pending 时返回 `Conflict`
    async fn reject(&self, id: i32, admin_id: i32) -> Result<TicketTransfer, RepositoryError>;
}
