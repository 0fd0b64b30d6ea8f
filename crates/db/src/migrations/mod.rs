//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_student_profile_table;
mod m20260301_000003_create_listing_table;
mod m20260301_000004_create_tenant_request_table;
mod m20260301_000005_create_listing_tenant_table;
mod m20260301_000006_create_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_student_profile_table::Migration),
            Box::new(m20260301_000003_create_listing_table::Migration),
            Box::new(m20260301_000004_create_tenant_request_table::Migration),
            Box::new(m20260301_000005_create_listing_tenant_table::Migration),
            Box::new(m20260301_000006_create_notification_table::Migration),
        ]
    }
}
