// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, seed_category, seed_ticket, seed_user};
use axum::http::StatusCode;
use helpdesk::domain::models::ticket::TicketStatus;
use helpdesk::domain::models::user::UserRole;
use serde_json::{json, Value};

#[tokio::test]
async fn test_notes_are_limited_to_assigned_agent_and_admin() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let other_agent = seed_user(db, "Ben", UserRole::Agent).await;
    let admin = seed_user(db, "Ada", UserRole::Administrator).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;
    let notes_path = format!("/v1/tickets/{}/notes", ticket_id);

    let by_requester = app
        .server
        .post(&notes_path)
        .add_header("Authorization", requester.bearer())
        .json(&json!({ "note": "Please hurry" }))
        .await;
    assert_eq!(by_requester.status_code(), StatusCode::FORBIDDEN);

    let by_other = app
        .server
        .post(&notes_path)
        .add_header("Authorization", other_agent.bearer())
        .json(&json!({ "note": "Drive-by" }))
        .await;
    assert_eq!(by_other.status_code(), StatusCode::FORBIDDEN);

    let empty = app
        .server
        .post(&notes_path)
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "note": "" }))
        .await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

    for (who, text) in [(&agent, "Checked the router"), (&admin, "Escalating")] {
        let response = app
            .server
            .post(&notes_path)
            .add_header("Authorization", who.bearer())
            .json(&json!({ "note": text }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["agent_id"], who.id);
    }

    let listed = app
        .server
        .get(&notes_path)
        .add_header("Authorization", agent.bearer())
        .await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    let body: Value = listed.json();
    let notes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["note"].as_str().unwrap())
        .collect();
    assert_eq!(notes, vec!["Checked the router", "Escalating"]);

    let hidden = app
        .server
        .get(&notes_path)
        .add_header("Authorization", requester.bearer())
        .await;
    assert_eq!(hidden.status_code(), StatusCode::FORBIDDEN);
}

/// 坐席发起转派，管理员批准后工单改派
#[tokio::test]
async fn test_approved_transfer_reassigns_ticket() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let target = seed_user(db, "Ben", UserRole::Agent).await;
    let admin = seed_user(db, "Ada", UserRole::Administrator).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::InProgress).await;

    let created = app
        .server
        .post(&format!("/v1/tickets/{}/transfers", ticket_id))
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "to_agent_id": target.id, "reason": "Out of office" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let transfer: Value = created.json();
    assert_eq!(transfer["status"], "pending");
    assert_eq!(transfer["from_agent_id"], agent.id);
    let transfer_id = transfer["id"].as_i64().unwrap();

    // 目标坐席可以看到请求，请求者不能列出
    let visible = app
        .server
        .get("/v1/transfers")
        .add_header("Authorization", target.bearer())
        .await;
    let body: Value = visible.json();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let requester_list = app
        .server
        .get("/v1/transfers")
        .add_header("Authorization", requester.bearer())
        .await;
    assert_eq!(requester_list.status_code(), StatusCode::FORBIDDEN);

    let approve_path = format!("/v1/transfers/{}/approve", transfer_id);

    let by_agent = app
        .server
        .post(&approve_path)
        .add_header("Authorization", agent.bearer())
        .await;
    assert_eq!(by_agent.status_code(), StatusCode::FORBIDDEN);

    let approved = app
        .server
        .post(&approve_path)
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(approved.status_code(), StatusCode::OK);
    let body: Value = approved.json();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["resolved_by_admin_id"], admin.id);

    let ticket = app
        .server
        .get(&format!("/v1/tickets/{}", ticket_id))
        .add_header("Authorization", admin.bearer())
        .await;
    let body: Value = ticket.json();
    assert_eq!(body["agent_id"], target.id);
    assert_eq!(body["status"], "in_progress");

    // 已处理的请求不能再处理
    let again = app
        .server
        .post(&format!("/v1/transfers/{}/reject", transfer_id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(again.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejected_transfer_keeps_assignment() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let target = seed_user(db, "Ben", UserRole::Agent).await;
    let admin = seed_user(db, "Ada", UserRole::Administrator).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;

    let created = app
        .server
        .post(&format!("/v1/tickets/{}/transfers", ticket_id))
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "to_agent_id": target.id }))
        .await;
    let transfer_id = created.json::<Value>()["id"].as_i64().unwrap();

    let rejected = app
        .server
        .post(&format!("/v1/transfers/{}/reject", transfer_id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(rejected.status_code(), StatusCode::OK);
    assert_eq!(rejected.json::<Value>()["status"], "rejected");

    let ticket = app
        .server
        .get(&format!("/v1/tickets/{}", ticket_id))
        .add_header("Authorization", agent.bearer())
        .await;
    assert_eq!(ticket.json::<Value>()["agent_id"], agent.id);
}

#[tokio::test]
async fn test_transfer_request_validation() {
    let app = create_test_app().await;
    let db = app.db.as_ref();

    let requester = seed_user(db, "Rita", UserRole::Requester).await;
    let agent = seed_user(db, "Ann", UserRole::Agent).await;
    let other_agent = seed_user(db, "Ben", UserRole::Agent).await;
    let category = seed_category(db, "General").await;
    let ticket_id =
        seed_ticket(db, requester.id, Some(agent.id), category, TicketStatus::Assigned).await;
    let path = format!("/v1/tickets/{}/transfers", ticket_id);

    // 只有当前坐席可以发起
    let by_other = app
        .server
        .post(&path)
        .add_header("Authorization", other_agent.bearer())
        .json(&json!({ "to_agent_id": other_agent.id }))
        .await;
    assert_eq!(by_other.status_code(), StatusCode::FORBIDDEN);

    let to_self = app
        .server
        .post(&path)
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "to_agent_id": agent.id }))
        .await;
    assert_eq!(to_self.status_code(), StatusCode::BAD_REQUEST);

    let to_requester = app
        .server
        .post(&path)
        .add_header("Authorization", agent.bearer())
        .json(&json!({ "to_agent_id": requester.id }))
        .await;
    assert_eq!(to_requester.status_code(), StatusCode::NOT_FOUND);
}
