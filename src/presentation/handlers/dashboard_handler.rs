// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::ticket_use_case::TicketUseCase;
use crate::presentation::extractors::caller::CurrentCaller;
use crate::presentation::handlers::ticket_handler::error_response;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 管理员仪表盘统计
pub async fn get_stats(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
) -> impl IntoResponse {
    match use_case.dashboard_stats(&caller).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}
