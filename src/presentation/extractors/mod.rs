// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求提取器模块
///
/// 从认证中间件写入的请求扩展中取出当前调用者，
/// 以及把解析失败统一成 JSON 错误体的请求体、路径和查询串提取器
pub mod api;
pub mod caller;
