// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::ticket_request::{
    CreateTicketRequestDto, ListTicketsQuery, UpdateStatusRequestDto,
};
use crate::application::use_cases::ticket_use_case::{TicketUseCase, TicketUseCaseError};
use crate::presentation::extractors::api::{ApiJson, ApiPath, ApiQuery};
use crate::presentation::extractors::caller::CurrentCaller;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

impl From<TicketUseCaseError> for (StatusCode, String) {
    fn from(err: TicketUseCaseError) -> Self {
        match err {
            TicketUseCaseError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            TicketUseCaseError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            TicketUseCaseError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            TicketUseCaseError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            TicketUseCaseError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

/// 把用例错误转换为统一的 JSON 错误响应
pub(crate) fn error_response(err: TicketUseCaseError) -> axum::response::Response {
    let (status, msg): (StatusCode, String) = err.into();
    (status, Json(json!({ "error": msg }))).into_response()
}

/// 创建工单
///
/// 成功时返回 201，响应体中带有分配结果（坐席或 Open 状态）
pub async fn create_ticket(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiJson(payload): ApiJson<CreateTicketRequestDto>,
) -> impl IntoResponse {
    match use_case.create_ticket(payload, &caller).await {
        Ok(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 列出调用者可见的工单
pub async fn list_tickets(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiQuery(query): ApiQuery<ListTicketsQuery>,
) -> impl IntoResponse {
    match use_case.list_tickets(query, &caller).await {
        Ok(tickets) => (StatusCode::OK, Json(tickets)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_ticket(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.get_ticket(id, &caller).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 修改工单状态
pub async fn update_status(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateStatusRequestDto>,
) -> impl IntoResponse {
    match use_case.change_status(id, payload.status, &caller).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 请求者发起重新打开
pub async fn request_reopen(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.request_reopen(id, &caller).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 坐席或管理员接受重新打开
pub async fn accept_reopen(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.accept_reopen(id, &caller).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => error_response(e),
    }
}
