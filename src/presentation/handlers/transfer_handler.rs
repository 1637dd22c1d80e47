// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::transfer_request::CreateTransferRequestDto;
use crate::application::use_cases::ticket_use_case::TicketUseCase;
use crate::presentation::extractors::api::{ApiJson, ApiPath};
use crate::presentation::extractors::caller::CurrentCaller;
use crate::presentation::handlers::ticket_handler::error_response;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 发起转派请求
pub async fn create_transfer(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(ticket_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<CreateTransferRequestDto>,
) -> impl IntoResponse {
    match use_case
        .create_transfer_request(ticket_id, payload, &caller)
        .await
    {
        Ok(transfer) => (StatusCode::CREATED, Json(transfer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 列出转派请求，管理员看到全部，坐席只看到与自己相关的
pub async fn list_transfers(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
) -> impl IntoResponse {
    match use_case.list_transfer_requests(&caller).await {
        Ok(transfers) => (StatusCode::OK, Json(transfers)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn approve_transfer(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.approve_transfer(id, &caller).await {
        Ok(transfer) => (StatusCode::OK, Json(transfer)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reject_transfer(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.reject_transfer(id, &caller).await {
        Ok(transfer) => (StatusCode::OK, Json(transfer)).into_response(),
        Err(e) => error_response(e),
    }
}
