// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::Caller;
use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 工单实体
///
/// 表示用户提交的一个支持请求。标题、描述、优先级、类别和创建人
/// 在创建后均不可变；状态和分配的坐席由生命周期状态机驱动。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// 系统分配的数字ID
    pub id: i32,
    /// 面向用户的工单编号，格式为 `TICKET-<6位数字>`
    pub ticket_code: String,
    /// 工单标题
    pub title: String,
    /// 初始描述
    pub initial_description: String,
    /// 当前状态
    pub status: TicketStatus,
    /// 创建时计算的优先级，之后不再改变
    pub priority: TicketPriority,
    /// 创建人（请求者）ID
    pub creator_id: i32,
    /// 当前分配的坐席ID，未分配时为空
    pub agent_id: Option<i32>,
    /// 所属类别ID
    pub category_id: i32,
    /// 所属子类别ID（可选）
    pub subcategory_id: Option<i32>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 最后更新时间，每次变更都会刷新
    pub updated_at: DateTime<FixedOffset>,
}

/// 工单在某次读取时的状态与坐席
///
/// 条件更新以它作为前提，任一字段被并发修改都会导致更新落空。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketState {
    pub status: TicketStatus,
    pub agent_id: Option<i32>,
}

/// 待插入的工单
///
/// 创建流程中分类完成、坐席尚未选出时的工单草稿。
/// 坐席与初始状态在仓库事务内确定。
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub ticket_code: String,
    pub title: String,
    pub initial_description: String,
    pub priority: TicketPriority,
    pub creator_id: i32,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
}

/// 工单优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            _ => Err(()),
        }
    }
}

/// 工单状态枚举
///
/// 典型流转：
/// Open → Assigned → InProgress → Resolved → Closed → RequestedReopen → Assigned/Open
///
/// 默认策略下任意状态之间都可以直接切换，见 [`StatusPolicy`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// 未分配坐席
    #[default]
    Open,
    /// 已分配坐席，等待处理
    Assigned,
    /// 坐席处理中
    InProgress,
    /// 已解决
    Resolved,
    /// 已关闭
    Closed,
    /// 关闭后请求重新打开，等待接受
    RequestedReopen,
}

impl TicketStatus {
    /// 计入坐席负载的状态
    pub const ACTIVE: [TicketStatus; 2] = [TicketStatus::Assigned, TicketStatus::InProgress];

    /// 计入"已解决或已关闭"统计的状态
    pub const DONE: [TicketStatus; 2] = [TicketStatus::Resolved, TicketStatus::Closed];

    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Open,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
        TicketStatus::RequestedReopen,
    ];

    /// 根据是否有坐席决定工单的初始（或重新激活后的）状态
    pub fn initial_for(agent_id: Option<i32>) -> Self {
        if agent_id.is_some() {
            TicketStatus::Assigned
        } else {
            TicketStatus::Open
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::Assigned => write!(f, "assigned"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
            TicketStatus::RequestedReopen => write!(f, "requested_reopen"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "assigned" => Ok(TicketStatus::Assigned),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            "requested_reopen" => Ok(TicketStatus::RequestedReopen),
            _ => Err(()),
        }
    }
}

/// 状态转换策略
///
/// `Permissive` 允许授权调用者在任意状态之间切换；
/// `Strict` 只允许下表中列出的边，同状态切换始终合法。
///
/// | 当前状态 | 允许的目标状态 |
/// |---|---|
/// | open | assigned, in_progress, resolved |
/// | assigned | open, in_progress, resolved |
/// | in_progress | assigned, resolved |
/// | resolved | in_progress, closed |
/// | closed | requested_reopen |
/// | requested_reopen | closed |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    #[default]
    Permissive,
    Strict,
}

impl StatusPolicy {
    /// 判断 `from → to` 在当前策略下是否合法
    pub fn allows(&self, from: TicketStatus, to: TicketStatus) -> bool {
        use TicketStatus::*;

        if from == to {
            return true;
        }

        match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::Strict => matches!(
                (from, to),
                (Open, Assigned)
                    | (Open, InProgress)
                    | (Open, Resolved)
                    | (Assigned, Open)
                    | (Assigned, InProgress)
                    | (Assigned, Resolved)
                    | (InProgress, Assigned)
                    | (InProgress, Resolved)
                    | (Resolved, InProgress)
                    | (Resolved, Closed)
                    | (Closed, RequestedReopen)
                    | (RequestedReopen, Closed)
            ),
        }
    }
}

/// 领域错误类型
///
/// 授权失败与状态前置条件失败都在这里表达，由用例层统一映射为 Forbidden。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: TicketStatus,
        to: TicketStatus,
    },

    /// 调用者与工单的关系不满足操作要求
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 输入不符合领域规则
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 生成工单编号
///
/// 随机六位数字，不检查冲突。
pub fn generate_ticket_code() -> String {
    let number: u32 = rand::rng().random_range(100_000..=999_999);
    format!("TICKET-{}", number)
}

impl Ticket {
    pub fn state(&self) -> TicketState {
        TicketState {
            status: self.status,
            agent_id: self.agent_id,
        }
    }

    /// 调用者是否是管理员、创建人或当前坐席
    pub fn is_related_to(&self, caller: &Caller) -> bool {
        caller.is_admin() || self.creator_id == caller.id || self.agent_id == Some(caller.id)
    }

    /// 调用者是否可以查看或添加内部备注
    pub fn accepts_notes_from(&self, caller: &Caller) -> bool {
        caller.is_admin() || (caller.is_agent() && self.agent_id == Some(caller.id))
    }

    /// 修改工单状态
    ///
    /// 只更新状态和更新时间，不会触发重新分配。
    ///
    /// # 参数
    ///
    /// * `to` - 目标状态
    /// * `caller` - 当前调用者
    /// * `policy` - 状态转换策略
    ///
    /// # 返回值
    ///
    /// * `Ok(Ticket)` - 更新后的工单
    /// * `Err(DomainError)` - 调用者无权限或转换不被策略允许
    pub fn change_status(
        mut self,
        to: TicketStatus,
        caller: &Caller,
        policy: StatusPolicy,
    ) -> Result<Self, DomainError> {
        if !self.is_related_to(caller) {
            return Err(DomainError::Forbidden(
                "Not authorized to update this ticket".to_string(),
            ));
        }

        if !policy.allows(self.status, to) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        self.updated_at = Utc::now().into();
        Ok(self)
    }

    /// 请求重新打开
    ///
    /// 仅当工单处于 Closed 时合法，状态变为 RequestedReopen。
    pub fn request_reopen(mut self, caller: &Caller) -> Result<Self, DomainError> {
        if !self.is_related_to(caller) {
            return Err(DomainError::Forbidden(
                "Not authorized to reopen this ticket".to_string(),
            ));
        }

        match self.status {
            TicketStatus::Closed => {
                self.status = TicketStatus::RequestedReopen;
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: TicketStatus::RequestedReopen,
            }),
        }
    }

    /// 检查调用者能否接受重新打开请求
    ///
    /// 工单无坐席时只有管理员可以接受；有坐席时只有该坐席可以接受。
    pub fn check_reopen_acceptor(&self, caller: &Caller) -> Result<(), DomainError> {
        if self.status != TicketStatus::RequestedReopen {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: TicketStatus::Assigned,
            });
        }

        let allowed = match self.agent_id {
            None => caller.is_admin(),
            Some(agent_id) => caller.id == agent_id,
        };

        if allowed {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Only the assigned agent, or an administrator for unassigned tickets, can accept a reopen request".to_string(),
            ))
        }
    }

    /// 接受重新打开请求，坐席保持不变
    ///
    /// 有坐席时状态为 Assigned，否则为 Open。无坐席工单的重新选择
    /// 需要读取负载，由仓库在写事务内完成。
    pub fn accept_reopen(mut self, caller: &Caller) -> Result<Self, DomainError> {
        self.check_reopen_acceptor(caller)?;

        self.status = TicketStatus::initial_for(self.agent_id);
        self.updated_at = Utc::now().into();
        Ok(self)
    }
}

#[cfg(test)]
#[path = "ticket_test.rs"]
mod tests;
