//! Create `student_profile` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfile::FullName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentProfile::AvatarUrl).string_len(1024))
                    .col(
                        ColumnDef::new(StudentProfile::UniversityName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProfile::Major)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profile_user")
                            .from(StudentProfile::Table, StudentProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudentProfile {
    Table,
    UserId,
    FullName,
    AvatarUrl,
    UniversityName,
    Major,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
