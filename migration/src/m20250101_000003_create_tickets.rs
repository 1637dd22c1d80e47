use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;
use crate::m20250101_000002_create_categories::{Categories, Subcategories};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tickets table
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tickets::TicketCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tickets::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tickets::InitialDescription).text().not_null())
                    .col(ColumnDef::new(Tickets::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::Priority).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::CreatorId).integer().not_null())
                    .col(ColumnDef::new(Tickets::AgentId).integer())
                    .col(ColumnDef::new(Tickets::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Tickets::SubcategoryId).integer())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tickets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_creator")
                            .from(Tickets::Table, Tickets::CreatorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_agent")
                            .from(Tickets::Table, Tickets::AgentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_category")
                            .from(Tickets::Table, Tickets::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_subcategory")
                            .from(Tickets::Table, Tickets::SubcategoryId)
                            .to(Subcategories::Table, Subcategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_agent_status")
                    .table(Tickets::Table)
                    .col(Tickets::AgentId)
                    .col(Tickets::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_creator")
                    .table(Tickets::Table)
                    .col(Tickets::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_code")
                    .table(Tickets::Table)
                    .col(Tickets::TicketCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Tickets {
    Table,
    Id,
    TicketCode,
    Title,
    InitialDescription,
    Status,
    Priority,
    CreatorId,
    AgentId,
    CategoryId,
    SubcategoryId,
    CreatedAt,
    UpdatedAt,
}
