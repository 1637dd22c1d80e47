// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含不依赖存储的纯业务规则：
/// - 优先级分类（priority_classifier）：由工单文本推导紧急程度
/// - 坐席选择（assignment_selector）：最少活跃工单优先的路由算法
///
/// 仓库实现和用例层都调用同一份选择逻辑，保证创建和重新打开时的路由一致。
pub mod assignment_selector;
pub mod priority_classifier;
