// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use helpdesk::application::use_cases::ticket_use_case::TicketUseCase;
use helpdesk::config::settings::Settings;
use helpdesk::domain::repositories::category_repository::CategoryRepository;
use helpdesk::infrastructure::database::connection;
use helpdesk::infrastructure::metrics;
use helpdesk::infrastructure::repositories::category_repo_impl::CategoryRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_note_repo_impl::TicketNoteRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_repo_impl::TicketRepositoryImpl;
use helpdesk::infrastructure::repositories::ticket_transfer_repo_impl::TicketTransferRepositoryImpl;
use helpdesk::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use helpdesk::presentation::middleware::auth_middleware::AuthState;
use helpdesk::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use helpdesk::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting helpdesk...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!(
        status_policy = ?settings.lifecycle.status_policy,
        "Configuration loaded"
    );

    // Initialize Prometheus Metrics
    metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let ticket_repo = Arc::new(
        TicketRepositoryImpl::new(db.clone())
            .with_category_serialization(settings.assignment.serialize_per_category),
    );
    let category_repo: Arc<dyn CategoryRepository> =
        Arc::new(CategoryRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let note_repo = Arc::new(TicketNoteRepositoryImpl::new(db.clone()));
    let transfer_repo = Arc::new(TicketTransferRepositoryImpl::new(db.clone()));

    // 5. Lifecycle use case
    let use_case = Arc::new(
        TicketUseCase::new(
            ticket_repo,
            category_repo.clone(),
            user_repo.clone(),
            note_repo,
            transfer_repo,
        )
        .with_status_policy(settings.lifecycle.status_policy),
    );

    // 6. Setup Auth State
    let auth_state = AuthState { user_repo };

    // 7. Start HTTP server
    let app = routes::routes(use_case, category_repo, auth_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
