// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::Caller;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// 当前调用者提取器
///
/// 只在认证中间件之后的路由上可用。
#[derive(Debug, Clone, Copy)]
pub struct CurrentCaller(pub Caller);

impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Caller>() {
            Some(caller) => Ok(CurrentCaller(*caller)),
            None => {
                let body = Json(json!({ "error": "Missing or invalid credentials" }));
                Err((StatusCode::UNAUTHORIZED, body).into_response())
            }
        }
    }
}
