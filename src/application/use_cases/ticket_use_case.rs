// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::{
        note_request::CreateNoteRequestDto,
        ticket_request::{CreateTicketRequestDto, ListTicketsQuery},
        transfer_request::CreateTransferRequestDto,
    },
    domain::{
        models::{
            dashboard::DashboardStats,
            ticket::{
                generate_ticket_code, DomainError, NewTicket, StatusPolicy, Ticket, TicketStatus,
            },
            ticket_note::{NewTicketNote, TicketNote},
            ticket_transfer::{NewTransferRequest, TicketTransfer},
            user::{Caller, UserRole},
        },
        repositories::{
            category_repository::CategoryRepository,
            ticket_note_repository::TicketNoteRepository,
            ticket_repository::{RepositoryError, TicketListFilter, TicketRepository},
            ticket_transfer_repository::TicketTransferRepository,
            user_repository::UserRepository,
        },
        services::priority_classifier::PriorityClassifier,
    },
    infrastructure::metrics,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use validator::Validate;

/// 列表默认条数
pub const DEFAULT_LIST_LIMIT: u64 = 100;
/// 列表最大条数
pub const MAX_LIST_LIMIT: u64 = 1000;

#[derive(Error, Debug)]
pub enum TicketUseCaseError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for TicketUseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TicketUseCaseError::NotFound("Record not found".into()),
            RepositoryError::Conflict => TicketUseCaseError::Conflict(
                "Ticket was modified concurrently, please retry".into(),
            ),
            RepositoryError::Database(e) => {
                error!("Database error: {}", e);
                TicketUseCaseError::Repository(RepositoryError::Database(e))
            }
        }
    }
}

impl From<DomainError> for TicketUseCaseError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStateTransition { .. } | DomainError::Forbidden(_) => {
                TicketUseCaseError::Forbidden(err.to_string())
            }
            DomainError::ValidationError(msg) => TicketUseCaseError::Validation(msg),
        }
    }
}

/// 工单生命周期用例
///
/// 协调分类、路由、状态机与仓库。所有检查都在写入之前完成，
/// 失败时不会留下部分写入。
pub struct TicketUseCase {
    ticket_repo: Arc<dyn TicketRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    user_repo: Arc<dyn UserRepository>,
    note_repo: Arc<dyn TicketNoteRepository>,
    transfer_repo: Arc<dyn TicketTransferRepository>,
    status_policy: StatusPolicy,
}

impl TicketUseCase {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        user_repo: Arc<dyn UserRepository>,
        note_repo: Arc<dyn TicketNoteRepository>,
        transfer_repo: Arc<dyn TicketTransferRepository>,
    ) -> Self {
        Self {
            ticket_repo,
            category_repo,
            user_repo,
            note_repo,
            transfer_repo,
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    async fn load_ticket(&self, id: i32) -> Result<Ticket, TicketUseCaseError> {
        self.ticket_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| TicketUseCaseError::NotFound(format!("Ticket {} not found", id)))
    }

    /// 创建工单
    ///
    /// 校验输入和类别，计算优先级，然后由仓库在一个事务内选出坐席并插入。
    /// 没有可用坐席时工单以 Open 状态创建。
    pub async fn create_ticket(
        &self,
        dto: CreateTicketRequestDto,
        caller: &Caller,
    ) -> Result<Ticket, TicketUseCaseError> {
        dto.validate()
            .map_err(|e| TicketUseCaseError::Validation(e.to_string()))?;

        if !self.category_repo.exists(dto.category_id).await? {
            return Err(TicketUseCaseError::NotFound(format!(
                "Category {} not found",
                dto.category_id
            )));
        }

        if let Some(subcategory_id) = dto.subcategory_id {
            if !self
                .category_repo
                .subcategory_belongs(subcategory_id, dto.category_id)
                .await?
            {
                return Err(TicketUseCaseError::Validation(format!(
                    "Subcategory {} does not belong to category {}",
                    subcategory_id, dto.category_id
                )));
            }
        }

        let priority = PriorityClassifier::classify(&dto.title, &dto.description);
        debug!(title = %dto.title, %priority, "Classified ticket priority");

        let draft = NewTicket {
            ticket_code: generate_ticket_code(),
            title: dto.title,
            initial_description: dto.description,
            priority,
            creator_id: caller.id,
            category_id: dto.category_id,
            subcategory_id: dto.subcategory_id,
        };

        let ticket = self.ticket_repo.create_routed(draft).await?;

        match ticket.agent_id {
            Some(agent_id) => info!(
                ticket_id = ticket.id,
                ticket_code = %ticket.ticket_code,
                agent_id,
                "Ticket created and assigned"
            ),
            None => info!(
                ticket_id = ticket.id,
                ticket_code = %ticket.ticket_code,
                category_id = ticket.category_id,
                "Ticket created without an eligible agent"
            ),
        }
        metrics::record_ticket_created(ticket.priority, ticket.agent_id.is_some());

        Ok(ticket)
    }

    /// 修改工单状态，不会触发重新分配
    ///
    /// 宽松策略下后写者胜出。严格策略校验的是读取到的状态，
    /// 因此写入以该状态为前提，期间被改动则返回冲突。
    pub async fn change_status(
        &self,
        ticket_id: i32,
        status: TicketStatus,
        caller: &Caller,
    ) -> Result<Ticket, TicketUseCaseError> {
        let ticket = self.load_ticket(ticket_id).await?;
        let expected = ticket.state();

        let updated = ticket
            .change_status(status, caller, self.status_policy)
            .inspect_err(|e| warn!(ticket_id, caller_id = caller.id, "Status change rejected: {}", e))?;

        let persisted = match self.status_policy {
            StatusPolicy::Permissive => {
                self.ticket_repo
                    .update_status(ticket_id, updated.status)
                    .await?
            }
            StatusPolicy::Strict => {
                self.ticket_repo
                    .transition(ticket_id, expected, updated.status, expected.agent_id)
                    .await
                    .inspect_err(|e| {
                        if matches!(e, RepositoryError::Conflict) {
                            warn!(ticket_id, from = %expected.status, "Status changed concurrently");
                        }
                    })?
            }
        };

        info!(ticket_id, from = %expected.status, to = %persisted.status, "Ticket status changed");
        metrics::record_status_change(persisted.status);

        Ok(persisted)
    }

    /// 请求重新打开已关闭的工单
    pub async fn request_reopen(
        &self,
        ticket_id: i32,
        caller: &Caller,
    ) -> Result<Ticket, TicketUseCaseError> {
        let ticket = self.load_ticket(ticket_id).await?;
        let expected = ticket.state();

        let requested = ticket
            .request_reopen(caller)
            .inspect_err(|e| warn!(ticket_id, caller_id = caller.id, "Reopen request rejected: {}", e))?;

        let persisted = self
            .ticket_repo
            .transition(ticket_id, expected, requested.status, requested.agent_id)
            .await?;

        info!(ticket_id, caller_id = caller.id, "Reopen requested");
        metrics::record_reopen("requested");

        Ok(persisted)
    }

    /// 接受重新打开请求
    ///
    /// 工单有坐席时回到 Assigned；没有坐席时由仓库在同一事务内按类别
    /// 重新选择并写入，仍无可用坐席则回到 Open。
    pub async fn accept_reopen(
        &self,
        ticket_id: i32,
        caller: &Caller,
    ) -> Result<Ticket, TicketUseCaseError> {
        let ticket = self.load_ticket(ticket_id).await?;
        let expected = ticket.state();

        ticket
            .check_reopen_acceptor(caller)
            .inspect_err(|e| warn!(ticket_id, caller_id = caller.id, "Reopen accept rejected: {}", e))?;

        let persisted = match expected.agent_id {
            Some(_) => {
                let accepted = ticket.accept_reopen(caller)?;
                self.ticket_repo
                    .transition(ticket_id, expected, accepted.status, accepted.agent_id)
                    .await?
            }
            None => {
                debug!(ticket_id, category_id = ticket.category_id, "Re-running agent selection");
                self.ticket_repo.accept_reopen_routed(ticket_id).await?
            }
        };

        info!(
            ticket_id,
            status = %persisted.status,
            agent_id = ?persisted.agent_id,
            "Reopen accepted"
        );
        metrics::record_reopen("accepted");

        Ok(persisted)
    }

    /// 仪表盘统计，仅管理员可见
    pub async fn dashboard_stats(
        &self,
        caller: &Caller,
    ) -> Result<DashboardStats, TicketUseCaseError> {
        if !caller.is_admin() {
            return Err(TicketUseCaseError::Forbidden(
                "Only administrators can view dashboard statistics".into(),
            ));
        }

        Ok(self.ticket_repo.dashboard_counts().await?)
    }

    pub async fn get_ticket(
        &self,
        ticket_id: i32,
        caller: &Caller,
    ) -> Result<Ticket, TicketUseCaseError> {
        let ticket = self.load_ticket(ticket_id).await?;

        if !ticket.is_related_to(caller) {
            return Err(TicketUseCaseError::Forbidden(
                "Not authorized to view this ticket".into(),
            ));
        }

        Ok(ticket)
    }

    /// 按角色列出工单
    ///
    /// 管理员看到全部，坐席看到分配给自己的，请求者看到自己创建的。
    pub async fn list_tickets(
        &self,
        query: ListTicketsQuery,
        caller: &Caller,
    ) -> Result<Vec<Ticket>, TicketUseCaseError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        let offset = query.offset.unwrap_or(0);

        let filter = match caller.role {
            UserRole::Administrator => TicketListFilter::default(),
            UserRole::Agent => TicketListFilter {
                agent_id: Some(caller.id),
                ..Default::default()
            },
            UserRole::Requester => TicketListFilter {
                creator_id: Some(caller.id),
                ..Default::default()
            },
        };

        Ok(self.ticket_repo.list(filter, limit, offset).await?)
    }

    pub async fn add_note(
        &self,
        ticket_id: i32,
        dto: CreateNoteRequestDto,
        caller: &Caller,
    ) -> Result<TicketNote, TicketUseCaseError> {
        dto.validate()
            .map_err(|e| TicketUseCaseError::Validation(e.to_string()))?;

        let ticket = self.load_ticket(ticket_id).await?;
        if !ticket.accepts_notes_from(caller) {
            return Err(TicketUseCaseError::Forbidden(
                "Only the assigned agent or an administrator can add notes".into(),
            ));
        }

        let note = self
            .note_repo
            .create(NewTicketNote {
                ticket_id,
                agent_id: caller.id,
                note: dto.note,
            })
            .await?;

        info!(ticket_id, note_id = note.id, "Note added");
        Ok(note)
    }

    pub async fn list_notes(
        &self,
        ticket_id: i32,
        caller: &Caller,
    ) -> Result<Vec<TicketNote>, TicketUseCaseError> {
        let ticket = self.load_ticket(ticket_id).await?;
        if !ticket.accepts_notes_from(caller) {
            return Err(TicketUseCaseError::Forbidden(
                "Notes are only visible to the assigned agent and administrators".into(),
            ));
        }

        Ok(self.note_repo.list_by_ticket(ticket_id).await?)
    }

    /// 发起转派请求
    pub async fn create_transfer_request(
        &self,
        ticket_id: i32,
        dto: CreateTransferRequestDto,
        caller: &Caller,
    ) -> Result<TicketTransfer, TicketUseCaseError> {
        dto.validate()
            .map_err(|e| TicketUseCaseError::Validation(e.to_string()))?;

        let ticket = self.load_ticket(ticket_id).await?;
        let draft = NewTransferRequest::draft(&ticket, dto.to_agent_id, dto.reason, caller)?;

        let target_is_agent = self
            .user_repo
            .find_by_id(dto.to_agent_id)
            .await?
            .is_some_and(|user| user.role == UserRole::Agent);
        if !target_is_agent {
            return Err(TicketUseCaseError::NotFound(format!(
                "Agent {} not found",
                dto.to_agent_id
            )));
        }

        let transfer = self.transfer_repo.create(draft).await?;
        info!(
            transfer_id = transfer.id,
            ticket_id,
            to_agent_id = transfer.to_agent_id,
            "Transfer requested"
        );

        Ok(transfer)
    }

    async fn load_transfer(&self, id: i32) -> Result<TicketTransfer, TicketUseCaseError> {
        self.transfer_repo.find_by_id(id).await?.ok_or_else(|| {
            TicketUseCaseError::NotFound(format!("Transfer request {} not found", id))
        })
    }

    /// 批准转派请求并改派工单
    pub async fn approve_transfer(
        &self,
        transfer_id: i32,
        caller: &Caller,
    ) -> Result<TicketTransfer, TicketUseCaseError> {
        let transfer = self.load_transfer(transfer_id).await?;
        transfer.ensure_resolvable_by(caller)?;

        let approved = self.transfer_repo.approve(transfer_id, caller.id).await?;
        info!(
            transfer_id,
            ticket_id = approved.ticket_id,
            to_agent_id = approved.to_agent_id,
            "Transfer approved"
        );

        Ok(approved)
    }

    pub async fn reject_transfer(
        &self,
        transfer_id: i32,
        caller: &Caller,
    ) -> Result<TicketTransfer, TicketUseCaseError> {
        let transfer = self.load_transfer(transfer_id).await?;
        transfer.ensure_resolvable_by(caller)?;

        let rejected = self.transfer_repo.reject(transfer_id, caller.id).await?;
        info!(transfer_id, ticket_id = rejected.ticket_id, "Transfer rejected");

        Ok(rejected)
    }

    /// 管理员看到全部请求，坐席只看到自己作为来源或目标的请求
    pub async fn list_transfer_requests(
        &self,
        caller: &Caller,
    ) -> Result<Vec<TicketTransfer>, TicketUseCaseError> {
        let agent_filter = match caller.role {
            UserRole::Administrator => None,
            UserRole::Agent => Some(caller.id),
            UserRole::Requester => {
                return Err(TicketUseCaseError::Forbidden(
                    "Only agents and administrators can view transfer requests".into(),
                ))
            }
        };

        Ok(self.transfer_repo.list(agent_filter).await?)
    }
}

#[cfg(test)]
#[path = "ticket_use_case_test.rs"]
mod tests;
