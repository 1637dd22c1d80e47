// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::note_request::CreateNoteRequestDto;
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

/// 添加内部备注
pub async fn add_note(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(ticket_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<CreateNoteRequestDto>,
) -> impl IntoResponse {
    match use_case.add_note(ticket_id, payload, &caller).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_notes(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    CurrentCaller(caller): CurrentCaller,
    ApiPath(ticket_id): ApiPath<i32>,
) -> impl IntoResponse {
    match use_case.list_notes(ticket_id, &caller).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => error_response(e),
    }
}
