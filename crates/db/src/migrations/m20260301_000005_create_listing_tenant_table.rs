//! Create `listing_tenant` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingTenant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingTenant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingTenant::ListingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingTenant::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingTenant::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_tenant_listing")
                            .from(ListingTenant::Table, ListingTenant::ListingId)
                            .to(Listing::Table, Listing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_tenant_user")
                            .from(ListingTenant::Table, ListingTenant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (listing_id, user_id) - a user is on a roster at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_tenant_listing_user")
                    .table(ListingTenant::Table)
                    .col(ListingTenant::ListingId)
                    .col(ListingTenant::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingTenant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingTenant {
    Table,
    Id,
    ListingId,
    UserId,
    AddedAt,
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
