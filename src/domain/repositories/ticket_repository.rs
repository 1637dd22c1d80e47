// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dashboard::DashboardStats;
use crate::domain::models::ticket::{NewTicket, Ticket, TicketState, TicketStatus};
use async_trait::async_trait;
use sea_orm::DbErr;
use std::collections::HashMap;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 条件更新未命中，记录已被并发修改
    #[error("Record was modified concurrently")]
    Conflict,
}

/// 工单列表过滤条件
///
/// 两个字段都为空时返回全部工单（管理员视图）。
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TicketListFilter {
    pub creator_id: Option<i32>,
    pub agent_id: Option<i32>,
}

/// 工单仓库特质
///
/// 定义工单数据访问接口
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// 根据ID查找工单
    async fn find_by_id(&self, id: i32) -> Result<Option<Ticket>, RepositoryError>;

    /// 按过滤条件列出工单，按ID升序
    async fn list(
        &self,
        filter: TicketListFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Ticket>, RepositoryError>;

    /// 创建并路由工单
    ///
    /// 在同一事务内读取类别坐席、统计活跃工单、选出坐席并插入，
    /// 初始状态由是否选出坐席决定。
    async fn create_routed(&self, draft: NewTicket) -> Result<Ticket, RepositoryError>;

    /// 无条件更新工单状态
    ///
    /// 行锁内读取并写入，并发写入以最后提交者为准。只用于宽松策略。
    async fn update_status(&self, id: i32, status: TicketStatus)
        -> Result<Ticket, RepositoryError>;

    /// 条件状态转换
    ///
    /// 仅当状态和坐席都仍与 `expected` 一致时写入 `to` 和 `agent_id`，
    /// 否则返回 `Conflict`。
    async fn transition(
        &self,
        id: i32,
        expected: TicketState,
        to: TicketStatus,
        agent_id: Option<i32>,
    ) -> Result<Ticket, RepositoryError>;

    /// 接受无坐席工单的重新打开请求
    ///
    /// 在同一事务内重新选择坐席并写入，工单必须仍处于 RequestedReopen 且无坐席，
    /// 否则返回 `Conflict`。选出坐席时状态为 Assigned，否则为 Open。
    async fn accept_reopen_routed(&self, id: i32) -> Result<Ticket, RepositoryError>;

    /// 统计给定坐席处于指定状态的工单数
    ///
    /// 返回稀疏映射，没有工单的坐席不出现在结果中。
    async fn count_active_tickets_by_agent(
        &self,
        agent_ids: &[i32],
        statuses: &[TicketStatus],
    ) -> Result<HashMap<i32, u64>, RepositoryError>;

    /// 单次聚合查询得到仪表盘统计
    async fn dashboard_counts(&self) -> Result<DashboardStats, RepositoryError>;
}
