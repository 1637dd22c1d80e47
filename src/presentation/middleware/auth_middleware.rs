// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::Caller;
use crate::domain::repositories::user_repository::UserRepository;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 用户仓库，用于通过 API Key 摘要查找用户
    pub user_repo: Arc<dyn UserRepository>,
}

/// 计算 API Key 的存储摘要（SHA-256 十六进制）
pub fn hash_api_key(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// 认证中间件
///
/// 验证 `Authorization: Bearer <token>`，成功后把 [`Caller`] 写入请求扩展。
/// 只挂在受保护路由上，公开路由不经过这里。
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(StatusCode)` - 认证失败的状态码
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_owned();
    debug!("AuthMiddleware processing path: {}", path);

    let key_hash = {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        hash_api_key(token)
    };

    match state.user_repo.find_by_api_key_hash(&key_hash).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(Caller::from(&user));
            Ok(next.run(req).await)
        }
        Ok(None) => {
            warn!("Unknown API key presented for {}", path);
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            error!("Database error checking API key: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
