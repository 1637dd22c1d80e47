// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::{DomainError, Ticket};
use crate::domain::models::user::Caller;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 转派请求状态
///
/// Pending → Approved | Rejected，终态不可再变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransferStatus::Pending => write!(f, "pending"),
            TransferStatus::Approved => write!(f, "approved"),
            TransferStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for TransferStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransferStatus::Pending),
            "approved" => Ok(TransferStatus::Approved),
            "rejected" => Ok(TransferStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// 工单转派请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTransfer {
    pub id: i32,
    pub ticket_id: i32,
    /// 发起时工单的坐席，管理员转派未分配工单时为空
    pub from_agent_id: Option<i32>,
    pub to_agent_id: i32,
    /// 发起人
    pub requested_by: i32,
    pub request_reason: Option<String>,
    pub status: TransferStatus,
    pub resolved_by_admin_id: Option<i32>,
    pub resolved_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
}

/// 待插入的转派请求
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransferRequest {
    pub ticket_id: i32,
    pub from_agent_id: Option<i32>,
    pub to_agent_id: i32,
    pub requested_by: i32,
    pub request_reason: Option<String>,
}

impl NewTransferRequest {
    /// 起草转派请求
    ///
    /// 管理员可以转派未分配的工单；其他情况只有工单当前坐席可以发起。
    /// 目标坐席不能是当前坐席。
    ///
    /// # 参数
    ///
    /// * `ticket` - 被转派的工单
    /// * `to_agent_id` - 目标坐席，调用前需确认其存在且角色为坐席
    /// * `reason` - 转派原因
    /// * `caller` - 当前调用者
    pub fn draft(
        ticket: &Ticket,
        to_agent_id: i32,
        reason: Option<String>,
        caller: &Caller,
    ) -> Result<Self, DomainError> {
        let admin_on_unassigned = caller.is_admin() && ticket.agent_id.is_none();
        let assigned_agent = caller.is_agent() && ticket.agent_id == Some(caller.id);

        if !admin_on_unassigned && !assigned_agent {
            return Err(DomainError::Forbidden(
                "Only the assigned agent can request a transfer for this ticket".to_string(),
            ));
        }

        if ticket.agent_id == Some(to_agent_id) {
            return Err(DomainError::ValidationError(
                "Ticket is already assigned to the target agent".to_string(),
            ));
        }

        Ok(Self {
            ticket_id: ticket.id,
            from_agent_id: ticket.agent_id,
            to_agent_id,
            requested_by: caller.id,
            request_reason: reason.filter(|r| !r.trim().is_empty()),
        })
    }
}

impl TicketTransfer {
    /// 审批或驳回前的检查：仅管理员，且请求仍处于 Pending
    pub fn ensure_resolvable_by(&self, caller: &Caller) -> Result<(), DomainError> {
        if !caller.is_admin() {
            return Err(DomainError::Forbidden(
                "Only administrators can resolve transfer requests".to_string(),
            ));
        }

        if self.status != TransferStatus::Pending {
            return Err(DomainError::Forbidden(format!(
                "Transfer request {} is already {}",
                self.id, self.status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "ticket_transfer_test.rs"]
mod tests;
