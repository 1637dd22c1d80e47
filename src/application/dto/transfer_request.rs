// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 转派请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateTransferRequestDto {
    /// 目标坐席
    pub to_agent_id: i32,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}
