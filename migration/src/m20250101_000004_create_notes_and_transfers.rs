use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;
use crate::m20250101_000003_create_tickets::Tickets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketNotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TicketNotes::TicketId).integer().not_null())
                    .col(ColumnDef::new(TicketNotes::AgentId).integer().not_null())
                    .col(ColumnDef::new(TicketNotes::Note).text().not_null())
                    .col(
                        ColumnDef::new(TicketNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TicketNotes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_notes_ticket")
                            .from(TicketNotes::Table, TicketNotes::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_notes_agent")
                            .from(TicketNotes::Table, TicketNotes::AgentId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_notes_ticket")
                    .table(TicketNotes::Table)
                    .col(TicketNotes::TicketId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TicketTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketTransfers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TicketTransfers::TicketId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TicketTransfers::FromAgentId).integer())
                    .col(
                        ColumnDef::new(TicketTransfers::ToAgentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketTransfers::RequestedBy)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TicketTransfers::RequestReason).text())
                    .col(
                        ColumnDef::new(TicketTransfers::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TicketTransfers::ResolvedByAdminId).integer())
                    .col(ColumnDef::new(TicketTransfers::ResolvedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TicketTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_transfers_ticket")
                            .from(TicketTransfers::Table, TicketTransfers::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_transfers_to_agent")
                            .from(TicketTransfers::Table, TicketTransfers::ToAgentId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_transfers_status")
                    .table(TicketTransfers::Table)
                    .col(TicketTransfers::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketTransfers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TicketNotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TicketNotes {
    Table,
    Id,
    TicketId,
    AgentId,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TicketTransfers {
    Table,
    Id,
    TicketId,
    FromAgentId,
    ToAgentId,
    RequestedBy,
    RequestReason,
    Status,
    ResolvedByAdminId,
    ResolvedAt,
    CreatedAt,
}
