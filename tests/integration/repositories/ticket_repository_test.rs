// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::{assign_to_category, seed_category, seed_ticket, seed_user, setup_db};
use helpdesk::domain::models::ticket::{NewTicket, TicketPriority, TicketState, TicketStatus};
use helpdesk::domain::models::ticket_transfer::NewTransferRequest;
use helpdesk::domain::models::user::UserRole;
use helpdesk::domain::repositories::category_repository::CategoryRepository;
use helpdesk::domain::repositories::ticket_repository::{
    RepositoryError, TicketListFilter, TicketRepository,
};
use helpdesk::domain::repositories::ticket_transfer_repository::TicketTransferRepository;
use helpdesk::infrastructure::repositories::category_repo_impl::CategoryRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_repo_impl::TicketRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_transfer_repo_impl::TicketTransferRepositoryImpl;

fn state(status: TicketStatus, agent_id: Option<i32>) -> TicketState {
    TicketState { status, agent_id }
}

fn draft(creator_id: i32, category_id: i32) -> NewTicket {
    NewTicket {
        ticket_code: "TICKET-123456".to_string(),
        title: "Printer jam".to_string(),
        initial_description: "Tray two".to_string(),
        priority: TicketPriority::Medium,
        creator_id,
        category_id,
        subcategory_id: None,
    }
}

#[tokio::test]
async fn test_create_routed_counts_only_active_tickets() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let b = seed_user(&db, "Ben", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;
    assign_to_category(&db, a.id, category).await;
    assign_to_category(&db, b.id, category).await;

    seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::InProgress).await;
    for status in [TicketStatus::Closed, TicketStatus::Resolved, TicketStatus::Open] {
        seed_ticket(&db, requester.id, Some(b.id), category, status).await;
    }

    let created = repo.create_routed(draft(requester.id, category)).await.unwrap();

    assert_eq!(created.agent_id, Some(b.id));
    assert_eq!(created.status, TicketStatus::Assigned);
    assert_eq!(created.ticket_code, "TICKET-123456");
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn test_count_active_tickets_by_agent_omits_idle_agents() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let b = seed_user(&db, "Ben", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;

    seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::Assigned).await;
    seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::InProgress).await;
    seed_ticket(&db, requester.id, Some(b.id), category, TicketStatus::Closed).await;

    let counts = repo
        .count_active_tickets_by_agent(&[a.id, b.id], &TicketStatus::ACTIVE)
        .await
        .unwrap();

    assert_eq!(counts.get(&a.id), Some(&2));
    assert_eq!(counts.get(&b.id), None);

    let empty = repo
        .count_active_tickets_by_agent(&[], &TicketStatus::ACTIVE)
        .await
        .unwrap();
    assert!(empty.is_empty());
}

/// 条件更新：期望状态不符时返回冲突
#[tokio::test]
async fn test_transition_is_compare_and_set() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let category = seed_category(&db, "General").await;
    let id = seed_ticket(&db, requester.id, None, category, TicketStatus::Closed).await;
    let closed = state(TicketStatus::Closed, None);

    let moved = repo
        .transition(id, closed, TicketStatus::RequestedReopen, None)
        .await
        .unwrap();
    assert_eq!(moved.status, TicketStatus::RequestedReopen);

    let stale = repo
        .transition(id, closed, TicketStatus::RequestedReopen, None)
        .await;
    assert!(matches!(stale, Err(RepositoryError::Conflict)));

    let missing = repo
        .transition(9999, closed, TicketStatus::RequestedReopen, None)
        .await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

/// 状态未变但坐席已被改派时，条件更新同样落空
#[tokio::test]
async fn test_transition_keeps_agent_changed_after_read() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());
    let transfers = TicketTransferRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let admin = seed_user(&db, "Ada", UserRole::Administrator).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let b = seed_user(&db, "Ben", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;
    let id = seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::Closed).await;

    let read = repo.find_by_id(id).await.unwrap().unwrap().state();

    let transfer = transfers
        .create(NewTransferRequest {
            ticket_id: id,
            from_agent_id: Some(a.id),
            to_agent_id: b.id,
            requested_by: a.id,
            request_reason: None,
        })
        .await
        .unwrap();
    transfers.approve(transfer.id, admin.id).await.unwrap();

    let result = repo
        .transition(id, read, TicketStatus::RequestedReopen, read.agent_id)
        .await;
    assert!(matches!(result, Err(RepositoryError::Conflict)));

    let current = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(current.status, TicketStatus::Closed);
    assert_eq!(current.agent_id, Some(b.id));
}

#[tokio::test]
async fn test_accept_reopen_routed_picks_least_loaded_agent() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let b = seed_user(&db, "Ben", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;
    assign_to_category(&db, a.id, category).await;
    assign_to_category(&db, b.id, category).await;

    seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::InProgress).await;
    let id = seed_ticket(&db, requester.id, None, category, TicketStatus::RequestedReopen).await;

    let accepted = repo.accept_reopen_routed(id).await.unwrap();
    assert_eq!(accepted.status, TicketStatus::Assigned);
    assert_eq!(accepted.agent_id, Some(b.id));

    // 已经被接受过的请求不能再接受一次
    let again = repo.accept_reopen_routed(id).await;
    assert!(matches!(again, Err(RepositoryError::Conflict)));
}

#[tokio::test]
async fn test_accept_reopen_routed_without_agents_returns_to_open() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let category = seed_category(&db, "General").await;
    let id = seed_ticket(&db, requester.id, None, category, TicketStatus::RequestedReopen).await;

    let accepted = repo.accept_reopen_routed(id).await.unwrap();
    assert_eq!(accepted.status, TicketStatus::Open);
    assert_eq!(accepted.agent_id, None);
}

#[tokio::test]
async fn test_accept_reopen_routed_requires_unassigned_request() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;
    let assigned =
        seed_ticket(&db, requester.id, Some(a.id), category, TicketStatus::RequestedReopen).await;
    let closed = seed_ticket(&db, requester.id, None, category, TicketStatus::Closed).await;

    let result = repo.accept_reopen_routed(assigned).await;
    assert!(matches!(result, Err(RepositoryError::Conflict)));
    let untouched = repo.find_by_id(assigned).await.unwrap().unwrap();
    assert_eq!(untouched.status, TicketStatus::RequestedReopen);

    let result = repo.accept_reopen_routed(closed).await;
    assert!(matches!(result, Err(RepositoryError::Conflict)));

    let missing = repo.accept_reopen_routed(9999).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_update_status_refreshes_timestamp() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let requester = seed_user(&db, "Rita", UserRole::Requester).await;
    let category = seed_category(&db, "General").await;
    let id = seed_ticket(&db, requester.id, None, category, TicketStatus::Open).await;
    let before = repo.find_by_id(id).await.unwrap().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let after = repo.update_status(id, TicketStatus::Resolved).await.unwrap();

    assert_eq!(after.status, TicketStatus::Resolved);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);

    let missing = repo.update_status(9999, TicketStatus::Resolved).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_list_filters_and_orders_by_id() {
    let db = setup_db().await;
    let repo = TicketRepositoryImpl::new(db.clone());

    let rita = seed_user(&db, "Rita", UserRole::Requester).await;
    let ravi = seed_user(&db, "Ravi", UserRole::Requester).await;
    let category = seed_category(&db, "General").await;
    let first = seed_ticket(&db, rita.id, None, category, TicketStatus::Open).await;
    seed_ticket(&db, ravi.id, None, category, TicketStatus::Open).await;
    let third = seed_ticket(&db, rita.id, None, category, TicketStatus::Open).await;

    let filter = TicketListFilter {
        creator_id: Some(rita.id),
        ..Default::default()
    };
    let ids: Vec<i32> = repo
        .list(filter, 100, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(ids, vec![first, third]);
}

#[tokio::test]
async fn test_category_agents_exclude_non_agents() {
    let db = setup_db().await;
    let repo = CategoryRepositoryImpl::new(db.clone());

    let admin = seed_user(&db, "Ada", UserRole::Administrator).await;
    let b = seed_user(&db, "Ben", UserRole::Agent).await;
    let a = seed_user(&db, "Ann", UserRole::Agent).await;
    let category = seed_category(&db, "General").await;
    for user_id in [admin.id, a.id, b.id] {
        assign_to_category(&db, user_id, category).await;
    }

    let agents = repo.list_agents_for_category(category).await.unwrap();
    assert_eq!(agents, vec![b.id, a.id]);

    assert!(repo.exists(category).await.unwrap());
    assert!(!repo.exists(category + 1).await.unwrap());
}
