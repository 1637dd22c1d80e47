// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 仪表盘统计
///
/// 三个数字来自同一次聚合查询，满足 `pending = total - resolved_or_closed`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    /// 工单总数
    pub total: u64,
    /// 状态为 resolved 或 closed 的工单数
    pub resolved_or_closed: u64,
    /// 其余工单数
    pub pending: u64,
}

impl DashboardStats {
    pub fn from_counts(total: u64, resolved_or_closed: u64) -> Self {
        Self {
            total,
            resolved_or_closed,
            pending: total.saturating_sub(resolved_or_closed),
        }
    }
}
