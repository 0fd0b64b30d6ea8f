//! Create `tenant_request` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TenantRequest::ListingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantRequest::RequesterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TenantRequest::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(TenantRequest::Message).string_len(300))
                    .col(
                        ColumnDef::new(TenantRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TenantRequest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_request_listing")
                            .from(TenantRequest::Table, TenantRequest::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_request_requester")
                            .from(TenantRequest::Table, TenantRequest::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (listing_id, requester_id) - one request per student per listing
        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_request_listing_requester")
                    .table(TenantRequest::Table)
                    .col(TenantRequest::ListingId)
                    .col(TenantRequest::RequesterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (listing_id, status) (for listing pending requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_request_listing_status")
                    .table(TenantRequest::Table)
                    .col(TenantRequest::ListingId)
                    .col(TenantRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TenantRequest {
    Table,
    Id,
    ListingId,
    RequesterId,
    Status,
    Message,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Listing {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
