//! Listing service.
//!
//! Listing CRUD lives with the external collaborator; this covers the
//! owner-side mutations the tenant workflow needs.

use crate::services::guard::ListingGuard;
use roomshare_common::{AppError, AppResult};
use roomshare_db::{entities::listing, repositories::ListingRepository};
use serde::Serialize;

/// A lister's listing with its confirmed tenant count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingWithTenantCount {
    #[serde(flatten)]
    pub listing: listing::Model,
    pub tenant_count: u64,
}

#[derive(Clone)]
pub struct ListingService {
    listing_repo: ListingRepository,
    guard: ListingGuard,
}

impl ListingService {
    #[must_use]
    pub const fn new(listing_repo: ListingRepository, guard: ListingGuard) -> Self {
        Self {
            listing_repo,
            guard,
        }
    }

    /// Set or clear the contact phone. Owner only.
    pub async fn update_contact_phone(
        &self,
        actor_id: &str,
        listing_id: &str,
        phone: Option<&str>,
    ) -> AppResult<()> {
        self.guard.owned_listing(actor_id, listing_id).await?;

        let phone = phone.map(str::trim).filter(|p| !p.is_empty());
        self.listing_repo
            .update_contact_phone(listing_id, phone)
            .await?;

        tracing::info!(listing_id = %listing_id, "Contact phone updated");
        Ok(())
    }

    /// Archive a listing. Listings are never hard-deleted.
    pub async fn archive(&self, actor_id: &str, listing_id: &str) -> AppResult<()> {
        self.guard.owned_listing(actor_id, listing_id).await?;

        // The update is still scoped to the owner. Zero rows means the
        // listing went away or changed hands after the check.
        let changed = self.listing_repo.archive(listing_id, actor_id).await?;
        if changed == 0 {
            return Err(AppError::Unauthorized);
        }

        tracing::info!(listing_id = %listing_id, "Listing archived");
        Ok(())
    }

    /// The actor's non-archived listings, newest first, with tenant counts.
    pub async fn listings_for_lister(&self, lister_id: &str) -> AppResult<Vec<ListingWithTenantCount>> {
        let listings = self.listing_repo.find_active_by_lister(lister_id).await?;

        let ids: Vec<String> = listings.iter().map(|l| l.id.clone()).collect();
        let counts = self.listing_repo.tenant_counts(&ids).await?;

        Ok(listings
            .into_iter()
            .map(|listing| {
                let tenant_count = counts.get(&listing.id).copied().unwrap_or(0);
                ListingWithTenantCount {
                    listing,
                    tenant_count,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roomshare_db::entities::listing::ListingStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_listing(id: &str, lister_id: &str) -> listing::Model {
        listing::Model {
            id: id.to_string(),
            lister_id: lister_id.to_string(),
            title: "Room".to_string(),
            description: None,
            city: "Leeds".to_string(),
            max_occupants: 3,
            status: ListingStatus::Active,
            contact_phone: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(listing_db: MockDatabase, guard_db: MockDatabase) -> ListingService {
        ListingService::new(
            ListingRepository::new(Arc::new(listing_db.into_connection())),
            ListingGuard::new(ListingRepository::new(Arc::new(guard_db.into_connection()))),
        )
    }

    #[tokio::test]
    async fn test_update_contact_phone_by_non_owner() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        let result = service
            .update_contact_phone("intruder", "l1", Some("07700 900000"))
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_update_contact_phone_by_owner() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        assert!(
            service
                .update_contact_phone("owner", "l1", None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_archive_someone_elses_listing_never_updates() {
        // No exec results are queued: an update would fail with a database error.
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        let result = service.archive("intruder", "l1").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_archive_missing_listing_is_unauthorized() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<listing::Model>::new()]),
        );

        let result = service.archive("owner", "missing").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_archive_by_owner() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        assert!(service.archive("owner", "l1").await.is_ok());
    }

    #[tokio::test]
    async fn test_archive_lost_race_fails_closed() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        let result = service.archive("owner", "l1").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_listings_for_lister_fills_missing_counts() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_listing("l2", "owner"),
                    create_test_listing("l1", "owner"),
                ]])
                .append_query_results([[maplit::btreemap! {
                    "listing_id" => sea_orm::Value::String(Some(Box::new("l1".to_string()))),
                    "tenant_count" => sea_orm::Value::BigInt(Some(2)),
                }]]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let listings = service.listings_for_lister("owner").await.unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].listing.id, "l2");
        assert_eq!(listings[0].tenant_count, 0);
        assert_eq!(listings[1].tenant_count, 2);
    }
}
