// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dashboard::DashboardStats;
use crate::domain::models::ticket::{NewTicket, Ticket, TicketState, TicketStatus};
use crate::domain::repositories::ticket_repository::{
    RepositoryError, TicketListFilter, TicketRepository,
};
use crate::domain::services::assignment_selector::select_least_loaded;
use crate::infrastructure::database::entities::ticket as ticket_entity;
use crate::infrastructure::repositories::category_repo_impl::eligible_agents;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 工单仓库实现
///
/// 基于SeaORM实现的工单数据访问层
#[derive(Clone)]
pub struct TicketRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
    /// 是否按类别串行化创建（仅 PostgreSQL 生效）
    serialize_per_category: bool,
}

impl TicketRepositoryImpl {
    /// 创建新的工单仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的工单仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            serialize_per_category: false,
        }
    }

    /// 启用按类别的事务级咨询锁
    pub fn with_category_serialization(mut self, enabled: bool) -> Self {
        self.serialize_per_category = enabled;
        self
    }

    /// 同一类别的坐席选择互斥，锁随事务结束释放
    async fn lock_category(
        &self,
        txn: &DatabaseTransaction,
        category_id: i32,
    ) -> Result<(), DbErr> {
        if self.serialize_per_category && txn.get_database_backend() == DatabaseBackend::Postgres
        {
            txn.execute(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                "SELECT pg_advisory_xact_lock($1)",
                [i64::from(category_id).into()],
            ))
            .await?;
        }
        Ok(())
    }

    /// 选出负载最低的坐席，读取与调用者的写入在同一事务内
    async fn select_agent(
        txn: &DatabaseTransaction,
        category_id: i32,
    ) -> Result<Option<i32>, DbErr> {
        let eligible = eligible_agents(txn, category_id).await?;
        let counts = active_counts(txn, &eligible, &TicketStatus::ACTIVE).await?;
        let agent_id = select_least_loaded(&eligible, &counts);

        debug!(
            category_id,
            eligible = ?eligible,
            loads = ?counts,
            selected = ?agent_id,
            "Agent selection"
        );

        Ok(agent_id)
    }

    /// 条件更新未命中时区分冲突与不存在
    async fn missed<C: ConnectionTrait>(conn: &C, id: i32) -> RepositoryError {
        match ticket_entity::Entity::find_by_id(id).count(conn).await {
            Ok(0) => RepositoryError::NotFound,
            Ok(_) => RepositoryError::Conflict,
            Err(e) => e.into(),
        }
    }
}

fn matches_state(expected: TicketState) -> Condition {
    let agent = match expected.agent_id {
        Some(agent_id) => ticket_entity::Column::AgentId.eq(agent_id),
        None => ticket_entity::Column::AgentId.is_null(),
    };

    Condition::all()
        .add(ticket_entity::Column::Status.eq(expected.status.to_string()))
        .add(agent)
}

impl From<ticket_entity::Model> for Ticket {
    fn from(model: ticket_entity::Model) -> Self {
        Self {
            id: model.id,
            ticket_code: model.ticket_code,
            title: model.title,
            initial_description: model.initial_description,
            status: model.status.parse().unwrap_or_default(),
            priority: model.priority.parse().unwrap_or_default(),
            creator_id: model.creator_id,
            agent_id: model.agent_id,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 统计坐席在给定状态下的工单数，没有工单的坐席不出现在结果中
pub(crate) async fn active_counts<C: ConnectionTrait>(
    conn: &C,
    agent_ids: &[i32],
    statuses: &[TicketStatus],
) -> Result<HashMap<i32, u64>, DbErr> {
    if agent_ids.is_empty() || statuses.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i64)> = ticket_entity::Entity::find()
        .select_only()
        .column(ticket_entity::Column::AgentId)
        .column_as(Expr::col(ticket_entity::Column::Id).count(), "active")
        .filter(ticket_entity::Column::AgentId.is_in(agent_ids.iter().copied()))
        .filter(ticket_entity::Column::Status.is_in(statuses.iter().map(|s| s.to_string())))
        .group_by(ticket_entity::Column::AgentId)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(agent_id, count)| (agent_id, count.max(0) as u64))
        .collect())
}

#[async_trait]
impl TicketRepository for TicketRepositoryImpl {
    async fn find_by_id(&self, id: i32) -> Result<Option<Ticket>, RepositoryError> {
        let model = ticket_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(
        &self,
        filter: TicketListFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Ticket>, RepositoryError> {
        let mut query = ticket_entity::Entity::find();

        if let Some(creator_id) = filter.creator_id {
            query = query.filter(ticket_entity::Column::CreatorId.eq(creator_id));
        }

        if let Some(agent_id) = filter.agent_id {
            query = query.filter(ticket_entity::Column::AgentId.eq(agent_id));
        }

        let models = query
            .order_by_asc(ticket_entity::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_routed(&self, draft: NewTicket) -> Result<Ticket, RepositoryError> {
        let txn = self.db.begin().await?;

        self.lock_category(&txn, draft.category_id).await?;
        let agent_id = Self::select_agent(&txn, draft.category_id).await?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = ticket_entity::ActiveModel {
            ticket_code: Set(draft.ticket_code),
            title: Set(draft.title),
            initial_description: Set(draft.initial_description),
            status: Set(TicketStatus::initial_for(agent_id).to_string()),
            priority: Set(draft.priority.to_string()),
            creator_id: Set(draft.creator_id),
            agent_id: Set(agent_id),
            category_id: Set(draft.category_id),
            subcategory_id: Set(draft.subcategory_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model.insert(&txn).await?;
        txn.commit().await?;

        Ok(inserted.into())
    }

    async fn update_status(
        &self,
        id: i32,
        status: TicketStatus,
    ) -> Result<Ticket, RepositoryError> {
        let txn = self.db.begin().await?;

        let mut query = ticket_entity::Entity::find_by_id(id);
        // SQLite 没有行锁，写事务本身是串行的
        if txn.get_database_backend() == DatabaseBackend::Postgres {
            query = query.lock_exclusive();
        }

        let model = query.one(&txn).await?.ok_or(RepositoryError::NotFound)?;

        let mut active: ticket_entity::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    async fn transition(
        &self,
        id: i32,
        expected: TicketState,
        to: TicketStatus,
        agent_id: Option<i32>,
    ) -> Result<Ticket, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();

        let result = ticket_entity::Entity::update_many()
            .col_expr(ticket_entity::Column::Status, Expr::value(to.to_string()))
            .col_expr(ticket_entity::Column::AgentId, Expr::value(agent_id))
            .col_expr(ticket_entity::Column::UpdatedAt, Expr::value(now))
            .filter(ticket_entity::Column::Id.eq(id))
            .filter(matches_state(expected))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(Self::missed(self.db.as_ref(), id).await);
        }

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn accept_reopen_routed(&self, id: i32) -> Result<Ticket, RepositoryError> {
        let txn = self.db.begin().await?;

        let mut query = ticket_entity::Entity::find_by_id(id);
        if txn.get_database_backend() == DatabaseBackend::Postgres {
            query = query.lock_exclusive();
        }
        let model = query.one(&txn).await?.ok_or(RepositoryError::NotFound)?;

        let expected = TicketState {
            status: TicketStatus::RequestedReopen,
            agent_id: None,
        };
        if model.status != expected.status.to_string() || model.agent_id.is_some() {
            return Err(RepositoryError::Conflict);
        }

        self.lock_category(&txn, model.category_id).await?;
        let agent_id = Self::select_agent(&txn, model.category_id).await?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let result = ticket_entity::Entity::update_many()
            .col_expr(
                ticket_entity::Column::Status,
                Expr::value(TicketStatus::initial_for(agent_id).to_string()),
            )
            .col_expr(ticket_entity::Column::AgentId, Expr::value(agent_id))
            .col_expr(ticket_entity::Column::UpdatedAt, Expr::value(now))
            .filter(ticket_entity::Column::Id.eq(id))
            .filter(matches_state(expected))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::Conflict);
        }

        let updated = ticket_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        txn.commit().await?;

        Ok(updated.into())
    }

    async fn count_active_tickets_by_agent(
        &self,
        agent_ids: &[i32],
        statuses: &[TicketStatus],
    ) -> Result<HashMap<i32, u64>, RepositoryError> {
        Ok(active_counts(self.db.as_ref(), agent_ids, statuses).await?)
    }

    async fn dashboard_counts(&self) -> Result<DashboardStats, RepositoryError> {
        let done: Vec<String> = TicketStatus::DONE.iter().map(|s| s.to_string()).collect();

        let row: Option<(i64, i64)> = ticket_entity::Entity::find()
            .select_only()
            .column_as(Expr::col(ticket_entity::Column::Id).count(), "total")
            .column_as(
                SimpleExpr::from(Func::count(Expr::case(
                    ticket_entity::Column::Status.is_in(done),
                    Expr::cust("1"),
                ))),
                "resolved_or_closed",
            )
            .into_tuple()
            .one(self.db.as_ref())
            .await?;

        let (total, done) = row.unwrap_or((0, 0));
        Ok(DashboardStats::from_counts(
            total.max(0) as u64,
            done.max(0) as u64,
        ))
    }
}
