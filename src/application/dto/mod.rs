// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求体和查询参数，使用 validator 做输入校验
pub mod note_request;
pub mod ticket_request;
pub mod transfer_request;
