// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 工单仓库（ticket_repository）：工单的持久化、路由插入和条件转换
/// - 类别仓库（category_repository）：只读目录和坐席关联
/// - 用户仓库（user_repository）：身份投影和 API Key 查找
/// - 备注仓库（ticket_note_repository）
/// - 转派仓库（ticket_transfer_repository）
pub mod category_repository;
pub mod ticket_note_repository;
pub mod ticket_repository;
pub mod ticket_transfer_repository;
pub mod user_repository;
