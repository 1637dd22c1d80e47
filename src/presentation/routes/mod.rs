// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::ticket_use_case::TicketUseCase;
use crate::domain::repositories::category_repository::CategoryRepository;
use crate::presentation::handlers::{
    category_handler, dashboard_handler, note_handler, ticket_handler, transfer_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `use_case` - 工单生命周期用例
/// * `category_repo` - 类别目录仓库
/// * `auth_state` - 认证中间件状态
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(
    use_case: Arc<TicketUseCase>,
    category_repo: Arc<dyn CategoryRepository>,
    auth_state: AuthState,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let protected_routes = Router::new()
        .route(
            "/v1/tickets",
            post(ticket_handler::create_ticket).get(ticket_handler::list_tickets),
        )
        .route("/v1/tickets/{id}", get(ticket_handler::get_ticket))
        .route(
            "/v1/tickets/{id}/status",
            patch(ticket_handler::update_status),
        )
        .route(
            "/v1/tickets/{id}/reopen",
            post(ticket_handler::request_reopen),
        )
        .route(
            "/v1/tickets/{id}/reopen/accept",
            post(ticket_handler::accept_reopen),
        )
        .route(
            "/v1/tickets/{id}/notes",
            post(note_handler::add_note).get(note_handler::list_notes),
        )
        .route(
            "/v1/tickets/{id}/transfers",
            post(transfer_handler::create_transfer),
        )
        .route("/v1/transfers", get(transfer_handler::list_transfers))
        .route(
            "/v1/transfers/{id}/approve",
            post(transfer_handler::approve_transfer),
        )
        .route(
            "/v1/transfers/{id}/reject",
            post(transfer_handler::reject_transfer),
        )
        .route("/v1/dashboard/stats", get(dashboard_handler::get_stats))
        .route("/v1/categories", get(category_handler::list_categories))
        .route("/v1/categories/{id}", get(category_handler::get_category))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .layer(Extension(use_case))
        .layer(Extension(category_repo));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
