//! Listing repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{
    Listing, ListingTenant,
    listing::{self, ListingStatus},
    listing_tenant,
};
use roomshare_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    UpdateResult, sea_query::Expr,
};

/// Listing repository for database operations.
#[derive(Clone)]
pub struct ListingRepository {
    db: Arc<DatabaseConnection>,
}

impl ListingRepository {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a listing by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<listing::Model>> {
        Listing::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a lister's listings that are not archived, newest first.
    pub async fn find_active_by_lister(&self, lister_id: &str) -> AppResult<Vec<listing::Model>> {
        Listing::find()
            .filter(listing::Column::ListerId.eq(lister_id))
            .filter(listing::Column::Status.ne(ListingStatus::Archived))
            .order_by_desc(listing::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count roster rows for each of the given listings.
    ///
    /// Listings without tenants are absent from the map.
    pub async fn tenant_counts(&self, listing_ids: &[String]) -> AppResult<HashMap<String, u64>> {
        if listing_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, i64)> = ListingTenant::find()
            .select_only()
            .column(listing_tenant::Column::ListingId)
            .column_as(listing_tenant::Column::Id.count(), "tenant_count")
            .filter(listing_tenant::Column::ListingId.is_in(listing_ids.iter().cloned()))
            .group_by(listing_tenant::Column::ListingId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    /// Set or clear a listing's contact phone.
    pub async fn update_contact_phone(&self, id: &str, phone: Option<&str>) -> AppResult<u64> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result: UpdateResult = Listing::update_many()
            .col_expr(
                listing::Column::ContactPhone,
                Expr::value(phone.map(ToString::to_string)),
            )
            .col_expr(listing::Column::UpdatedAt, Expr::value(now))
            .filter(listing::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Archive a listing, scoped to its owner.
    ///
    /// Returns the number of rows changed; zero means the listing does not
    /// exist or belongs to someone else.
    pub async fn archive(&self, id: &str, lister_id: &str) -> AppResult<u64> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result: UpdateResult = Listing::update_many()
            .col_expr(listing::Column::Status, Expr::value(ListingStatus::Archived))
            .col_expr(listing::Column::UpdatedAt, Expr::value(now))
            .filter(listing::Column::Id.eq(id))
            .filter(listing::Column::ListerId.eq(lister_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_listing(id: &str, lister_id: &str) -> listing::Model {
        listing::Model {
            id: id.to_string(),
            lister_id: lister_id.to_string(),
            title: "Sunny double room".to_string(),
            description: None,
            city: "Leeds".to_string(),
            max_occupants: 3,
            status: ListingStatus::Active,
            contact_phone: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let listing = create_test_listing("l1", "owner");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[listing.clone()]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let found = repo.find_by_id("l1").await.unwrap().unwrap();

        assert_eq!(found.lister_id, "owner");
        assert!(found.accepts_tenant_requests());
    }

    #[tokio::test]
    async fn test_find_active_by_lister() {
        let l1 = create_test_listing("l1", "owner");
        let l2 = create_test_listing("l2", "owner");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let listings = repo.find_active_by_lister("owner").await.unwrap();

        assert_eq!(listings.len(), 2);
    }

    #[tokio::test]
    async fn test_tenant_counts_skips_query_for_empty_input() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ListingRepository::new(db);
        let counts = repo.tenant_counts(&[]).await.unwrap();

        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_tenant_counts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "listing_id" => sea_orm::Value::String(Some(Box::new("l1".to_string()))),
                    "tenant_count" => sea_orm::Value::BigInt(Some(2)),
                }]])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let counts = repo
            .tenant_counts(&["l1".to_string(), "l2".to_string()])
            .await
            .unwrap();

        assert_eq!(counts.get("l1"), Some(&2));
        assert_eq!(counts.get("l2"), None);
    }

    #[tokio::test]
    async fn test_archive_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ListingRepository::new(db);
        let rows = repo.archive("l1", "intruder").await.unwrap();

        assert_eq!(rows, 0);
    }
}
