// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    assign_to_category, create_test_app, create_test_app_with_policy, seed_category, seed_ticket,
    seed_user, SeededUser, TestApp,
};
use axum::http::StatusCode;
use axum_test::TestResponse;
use helpdesk::domain::models::ticket::{StatusPolicy, TicketStatus};
use helpdesk::domain::models::user::UserRole;
use serde_json::{json, Value};

async fn set_status(app: &TestApp, who: &SeededUser, ticket_id: i32, status: &str) -> TestResponse {
    app.server
        .patch(&format!("/v1/tickets/{}/status", ticket_id))
        .add_header("Authorization", who.bearer())
        .json(&json!({ "status": status }))
        .await
}

async fn post_as(app: &TestApp, who: &SeededUser, path: &str) -> TestResponse {
    app.server
        .post(path)
        .add_header("Authorization", who.bearer())
        .await
}

#[tokio::test]
async fn test_permissive_policy_allows_any_transition() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;

    let response = set_status(&app, &agent, ticket_id, "closed").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "closed");
    // 状态修改不改变分配
    assert_eq!(body["agent_id"], agent.id);

    let response = set_status(&app, &agent, ticket_id, "open").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_strict_policy_rejects_skipped_edges() {
    let app = create_test_app_with_policy(StatusPolicy::Strict).await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;

    let skipped = set_status(&app, &agent, ticket_id, "closed").await;
    assert_eq!(skipped.status_code(), StatusCode::FORBIDDEN);

    for status in ["in_progress", "resolved", "closed"] {
        let response = set_status(&app, &agent, ticket_id, status).await;
        assert_eq!(response.status_code(), StatusCode::OK, "to {}", status);
    }
}

#[tokio::test]
async fn test_unrelated_caller_cannot_change_status() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let other_agent = seed_user(db, "Ben", UserRole::Agent).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;

    let response = set_status(&app, &other_agent, ticket_id, "resolved").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let unknown = app
        .server
        .patch(&format!("/v1/tickets/{}/status", ticket_id))
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "status": "sleeping" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = unknown.json();
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

/// 完整的重新打开流程：关闭 → 请求 → 坐席接受 → Assigned
#[tokio::test]
async fn test_reopen_handshake_with_assigned_agent() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let other_agent = seed_user(db, "Ben", UserRole::Agent).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Closed).await;

    let reopen_path = format!("/v1/tickets/{}/reopen", ticket_id);
    let accept_path = format!("/v1/tickets/{}/reopen/accept", ticket_id);

    // 未请求时不能接受
    let early = post_as(&app, &agent, &accept_path).await;
    assert_eq!(early.status_code(), StatusCode::FORBIDDEN);

    let requested = post_as(&app, &requester, &reopen_path).await;
    assert_eq!(requested.status_code(), StatusCode::OK);
    let body: Value = requested.json();
    assert_eq!(body["status"], "requested_reopen");

    // 重复请求不再合法
    let again = post_as(&app, &requester, &reopen_path).await;
    assert_eq!(again.status_code(), StatusCode::FORBIDDEN);

    let wrong_agent = post_as(&app, &other_agent, &accept_path).await;
    assert_eq!(wrong_agent.status_code(), StatusCode::FORBIDDEN);

    let accepted = post_as(&app, &agent, &accept_path).await;
    assert_eq!(accepted.status_code(), StatusCode::OK);
    let body: Value = accepted.json();
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["agent_id"], agent.id);
}

#[tokio::test]
async fn test_reopen_request_requires_closed_ticket() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let stranger = seed_user(db, "Sam", UserRole::Requester).await;
    let category = seed_category(db, "General").await;
    let resolved = seed_ticket(db, requester.id, None, category, TicketStatus::Resolved).await;
    let closed = seed_ticket(db, requester.id, None, category, TicketStatus::Closed).await;

    let response = post_as(&app, &requester, &format!("/v1/tickets/{}/reopen", resolved)).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = post_as(&app, &stranger, &format!("/v1/tickets/{}/reopen", closed)).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = post_as(&app, &requester, "/v1/tickets/777777/reopen").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

/// 无坐席的工单由管理员接受，并重新选择坐席
#[tokio::test]
async fn test_admin_accepts_unassigned_reopen_and_reroutes() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let admin = seed_user(db, "Ada", UserRole::Administrator).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let staffed = seed_category(db, "Staffed").await;
    let empty = seed_category(db, "Empty").await;
    assign_to_category(db, agent.id, staffed).await;

    let rerouted =
        seed_ticket(db, requester.id, None, staffed, TicketStatus::RequestedReopen).await;
    let orphan = seed_ticket(db, requester.id, None, empty, TicketStatus::RequestedReopen).await;

    let by_agent = post_as(&app, &agent, &format!("/v1/tickets/{}/reopen/accept", rerouted)).await;
    assert_eq!(by_agent.status_code(), StatusCode::FORBIDDEN);

    let response =
        post_as(&app, &admin, &format!("/v1/tickets/{}/reopen/accept", rerouted)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["agent_id"], agent.id);

    let response = post_as(&app, &admin, &format!("/v1/tickets/{}/reopen/accept", orphan)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "open");
    assert!(body["agent_id"].is_null());
}

/// 重复设置同一状态不报错，只刷新更新时间
#[tokio::test]
async fn test_repeated_status_change_is_idempotent() {
    let app = create_test_app_with_policy(StatusPolicy::Strict).await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let category = seed_category(db, "General").await;
    let ticket_id = seed_ticket(db, requester.id, None, category, TicketStatus::Open).await;

    let skipped = set_status(&app, &requester, ticket_id, "closed").await;
    assert_eq!(skipped.status_code(), StatusCode::FORBIDDEN);

    let first: Value = set_status(&app, &requester, ticket_id, "resolved").await.json();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = set_status(&app, &requester, ticket_id, "resolved").await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second: Value = second.json();

    assert_eq!(second["status"], "resolved");
    let parse = |v: &Value| {
        chrono::DateTime::parse_from_rfc3339(v["updated_at"].as_str().unwrap()).unwrap()
    };
    assert!(parse(&second) > parse(&first));
}
