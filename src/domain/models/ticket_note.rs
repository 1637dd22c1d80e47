// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 工单内部备注
///
/// 只追加，不修改。仅管理员和当前坐席可见。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketNote {
    pub id: i32,
    pub ticket_id: i32,
    /// 备注作者
    pub agent_id: i32,
    pub note: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTicketNote {
    pub ticket_id: i32,
    pub agent_id: i32,
    pub note: String,
}
