// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use chrono::Utc;
use helpdesk::application::use_cases::ticket_use_case::TicketUseCase;
use helpdesk::config::settings::DatabaseSettings;
use helpdesk::domain::models::ticket::{StatusPolicy, TicketPriority, TicketStatus};
use helpdesk::domain::models::user::UserRole;
use helpdesk::domain::repositories::category_repository::CategoryRepository;
use helpdesk::infrastructure::database::connection;
use helpdesk::infrastructure::database::entities::{
    api_key, category, subcategory, ticket, user, user_category,
};
use helpdesk::infrastructure::repositories::category_repo_impl::CategoryRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_note_repo_impl::TicketNoteRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_repo_impl::TicketRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_transfer_repo_impl::TicketTransferRepositoryImpl;
use helpdesk::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use helpdesk::presentation::middleware::auth_middleware::{hash_api_key, AuthState};
use helpdesk::presentation::routes;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
}

/// 一个已种入的用户及其明文 API Key
#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: i32,
    pub token: String,
}

impl SeededUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// 创建已迁移的 SQLite 内存库
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
        min_connections: None,
        connect_timeout: None,
        idle_timeout: None,
    };

    let db = connection::create_pool(&settings)
        .await
        .expect("Failed to open SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(db)
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_policy(StatusPolicy::Permissive).await
}

pub async fn create_test_app_with_policy(policy: StatusPolicy) -> TestApp {
    let db = setup_db().await;

    let category_repo: Arc<dyn CategoryRepository> =
        Arc::new(CategoryRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));

    let use_case = Arc::new(
        TicketUseCase::new(
            Arc::new(TicketRepositoryImpl::new(db.clone())),
            category_repo.clone(),
            user_repo.clone(),
            Arc::new(TicketNoteRepositoryImpl::new(db.clone())),
            Arc::new(TicketTransferRepositoryImpl::new(db.clone())),
        )
        .with_status_policy(policy),
    );

    let app = routes::routes(use_case, category_repo, AuthState { user_repo });
    let server = TestServer::new(app).unwrap();

    TestApp { server, db }
}

fn role_column(role: UserRole) -> &'static str {
    match role {
        UserRole::Requester => "user",
        UserRole::Agent => "agent",
        UserRole::Administrator => "admin",
    }
}

/// 种入用户并为其签发一个 API Key
pub async fn seed_user(db: &DatabaseConnection, name: &str, role: UserRole) -> SeededUser {
    let now = Utc::now();
    let created = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
        role: Set(role_column(role).to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let token = format!("hd_{}_{}", name.to_lowercase(), created.id);
    api_key::Entity::insert(api_key::ActiveModel {
        key_hash: Set(hash_api_key(&token)),
        user_id: Set(created.id),
        created_at: Set(now.into()),
    })
    .exec_without_returning(db)
    .await
    .unwrap();

    SeededUser {
        id: created.id,
        token,
    }
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> i32 {
    category::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn seed_subcategory(db: &DatabaseConnection, category_id: i32, name: &str) -> i32 {
    subcategory::ActiveModel {
        category_id: Set(category_id),
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

/// 把用户加入类别的坐席名单
pub async fn assign_to_category(db: &DatabaseConnection, user_id: i32, category_id: i32) {
    user_category::Entity::insert(user_category::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
    })
    .exec_without_returning(db)
    .await
    .unwrap();
}

/// 直接写入一张工单，用于预置坐席负载
pub async fn seed_ticket(
    db: &DatabaseConnection,
    creator_id: i32,
    agent_id: Option<i32>,
    category_id: i32,
    status: TicketStatus,
) -> i32 {
    let now = Utc::now();
    ticket::ActiveModel {
        ticket_code: Set("TICKET-100000".to_string()),
        title: Set("Seeded".to_string()),
        initial_description: Set("Seeded ticket".to_string()),
        status: Set(status.to_string()),
        priority: Set(TicketPriority::Medium.to_string()),
        creator_id: Set(creator_id),
        agent_id: Set(agent_id),
        category_id: Set(category_id),
        subcategory_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}
