//! Create listing table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listing::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listing::ListerId).string_len(32).not_null())
                    .col(ColumnDef::new(Listing::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Listing::Description).text())
                    .col(ColumnDef::new(Listing::City).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Listing::MaxOccupants)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(Listing::MaxOccupants).gte(1)),
                    )
                    .col(
                        ColumnDef::new(Listing::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Listing::ContactPhone).string_len(30))
                    .col(
                        ColumnDef::new(Listing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Listing::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_lister")
                            .from(Listing::Table, Listing::ListerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (lister_id, status) (for the lister dashboard)
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_lister_status")
                    .table(Listing::Table)
                    .col(Listing::ListerId)
                    .col(Listing::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listing {
    Table,
    Id,
    ListerId,
    Title,
    Description,
    City,
    MaxOccupants,
    Status,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
