// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::TicketStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建工单请求
///
/// 优先级由服务端根据标题和描述计算，请求中不接受该字段。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateTicketRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStatusRequestDto {
    pub status: TicketStatus,
}

/// 工单列表查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListTicketsQuery {
    /// 默认 100，最大 1000
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
