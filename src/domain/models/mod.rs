// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 工单（ticket）：生命周期状态机与重新打开流程
/// - 用户（user）：身份投影与当前调用者
/// - 类别（category）：只读目录
/// - 内部备注（ticket_note）：坐席的追加式注释
/// - 转派请求（ticket_transfer）：工单改派的审批流程
/// - 仪表盘（dashboard）：汇总统计
pub mod category;
pub mod dashboard;
pub mod ticket;
pub mod ticket_note;
pub mod ticket_transfer;
pub mod user;
