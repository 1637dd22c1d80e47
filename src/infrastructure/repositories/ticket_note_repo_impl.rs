// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ticket_note::{NewTicketNote, TicketNote};
use crate::domain::repositories::ticket_note_repository::TicketNoteRepository;
use crate::domain::repositories::ticket_repository::RepositoryError;
use crate::infrastructure::database::entities::ticket_note as note_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// 工单备注仓库实现
#[derive(Clone)]
pub struct TicketNoteRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TicketNoteRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<note_entity::Model> for TicketNote {
    fn from(model: note_entity::Model) -> Self {
        Self {
            id: model.id,
            ticket_id: model.ticket_id,
            agent_id: model.agent_id,
            note: model.note,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl TicketNoteRepository for TicketNoteRepositoryImpl {
    async fn create(&self, note: NewTicketNote) -> Result<TicketNote, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = note_entity::ActiveModel {
            ticket_id: Set(note.ticket_id),
            agent_id: Set(note.agent_id),
            note: Set(note.note),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn list_by_ticket(&self, ticket_id: i32) -> Result<Vec<TicketNote>, RepositoryError> {
        let models = note_entity::Entity::find()
            .filter(note_entity::Column::TicketId.eq(ticket_id))
            .order_by_asc(note_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
