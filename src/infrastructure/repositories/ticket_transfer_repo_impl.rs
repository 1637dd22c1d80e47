// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket::TicketStatus;
use crate::domain::models::ticket_transfer::{NewTransferRequest, TicketTransfer, TransferStatus};
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::domain::repositories::ticket_transfer_repository::TicketTransferRepository;
use crate::infrastructure::database::entities::{
    ticket as ticket_entity, ticket_transfer as transfer_entity,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

/// 转派请求仓库实现
///
/// 审批和驳回都是对 `status = pending` 的条件更新，
/// 重复处理同一请求时返回 `Conflict`。
#[derive(Clone)]
pub struct TicketTransferRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TicketTransferRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 把 Pending 请求标记为终态，返回受影响行数
    async fn resolve<C: ConnectionTrait>(
        conn: &C,
        id: i32,
        admin_id: i32,
        outcome: TransferStatus,
    ) -> Result<u64, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();

        let result = transfer_entity::Entity::update_many()
            .col_expr(
                transfer_entity::Column::Status,
                Expr::value(outcome.to_string()),
            )
            .col_expr(
                transfer_entity::Column::ResolvedByAdminId,
                Expr::value(admin_id),
            )
            .col_expr(transfer_entity::Column::ResolvedAt, Expr::value(now))
            .filter(transfer_entity::Column::Id.eq(id))
            .filter(transfer_entity::Column::Status.eq(TransferStatus::Pending.to_string()))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }
}

impl From<transfer_entity::Model> for TicketTransfer {
    fn from(model: transfer_entity::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            from_agent_id: model.from_agent_id,
            to_agent_id: model.to_agent_id,
            requested_by: model.requested_by,
            request_reason: model.request_reason,
            status: model.status.parse().unwrap_or_default(),
            resolved_by_admin_id: model.resolved_by_admin_id,
            resolved_at: model.resolved_at,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl TicketTransferRepository for TicketTransferRepositoryImpl {
    async fn create(&self, request: NewTransferRequest) -> Result<TicketTransfer, RepositoryError> {
        let model = transfer_entity::ActiveModel {
            ticket_id: Set(request.ticket_id),
            from_agent_id: Set(request.from_agent_id),
            to_agent_id: Set(request.to_agent_id),
            requested_by: Set(request.requested_by),
            request_reason: Set(request.request_reason),
            status: Set(TransferStatus::Pending.to_string()),
            resolved_by_admin_id: Set(None),
            resolved_at: Set(None),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TicketTransfer>, RepositoryError> {
        let model = transfer_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, agent_id: Option<i32>) -> Result<Vec<TicketTransfer>, RepositoryError> {
        let mut query = transfer_entity::Entity::find();

        if let Some(agent_id) = agent_id {
            query = query.filter(
                Condition::any()
                    .add(transfer_entity::Column::FromAgentId.eq(agent_id))
                    .add(transfer_entity::Column::ToAgentId.eq(agent_id)),
            );
        }

        let models = query
            .order_by_asc(transfer_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn approve(&self, id: i32, admin_id: i32) -> Result<TicketTransfer, RepositoryError> {
        let txn = self.db.begin().await?;

        let transfer = transfer_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if Self::resolve(&txn, id, admin_id, TransferStatus::Approved).await? == 0 {
            return Err(RepositoryError::Conflict);
        }

        let mut query = ticket_entity::Entity::find_by_id(transfer.ticket_id);
        if txn.get_database_backend() == DatabaseBackend::Postgres {
            query = query.lock_exclusive();
        }
        let ticket = query.one(&txn).await?.ok_or(RepositoryError::NotFound)?;

        // 工单坐席在请求之后被改动过，放弃这次改派
        if ticket.agent_id != transfer.from_agent_id {
            return Err(RepositoryError::Conflict);
        }

        let was_open = ticket.status == TicketStatus::Open.to_string();
        let mut active: ticket_entity::ActiveModel = ticket.into();
        active.agent_id = Set(Some(transfer.to_agent_id));
        if was_open {
            active.status = Set(TicketStatus::Assigned.to_string());
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        let approved = transfer_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        txn.commit().await?;
        Ok(approved.into())
    }

    async fn reject(&self, id: i32, admin_id: i32) -> Result<TicketTransfer, RepositoryError> {
        let txn = self.db.begin().await?;

        let exists = transfer_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        if Self::resolve(&txn, id, admin_id, TransferStatus::Rejected).await? == 0 {
            return Err(RepositoryError::Conflict);
        }

        let rejected = transfer_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        txn.commit().await?;
        Ok(rejected.into())
    }
}
