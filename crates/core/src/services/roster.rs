//! Tenant roster service.

use crate::services::guard::ListingGuard;
use roomshare_common::{AppError, AppResult, IdGenerator};
use roomshare_db::{
    entities::listing_tenant,
    repositories::{ListingTenantRepository, TenantWithProfile},
};
use sea_orm::Set;

/// Outcome of [`RosterService::add_tenant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAddition {
    /// A new roster row was written.
    Added,
    /// The pair was already on the roster.
    AlreadyTenant,
}

/// Maintains the set of confirmed tenants per listing.
#[derive(Clone)]
pub struct RosterService {
    tenant_repo: ListingTenantRepository,
    guard: ListingGuard,
    id_gen: IdGenerator,
}

impl RosterService {
    /// Create a new roster service.
    #[must_use]
    pub const fn new(tenant_repo: ListingTenantRepository, guard: ListingGuard) -> Self {
        Self {
            tenant_repo,
            guard,
            id_gen: IdGenerator::new(),
        }
    }

    /// Put a user on a listing's roster.
    ///
    /// Idempotent: a duplicate pair counts as success. Any other store
    /// failure is returned.
    pub async fn add_tenant(&self, listing_id: &str, user_id: &str) -> AppResult<TenantAddition> {
        let model = listing_tenant::ActiveModel {
            id: Set(self.id_gen.generate()),
            listing_id: Set(listing_id.to_string()),
            user_id: Set(user_id.to_string()),
            added_at: Set(chrono::Utc::now().into()),
        };

        match self.tenant_repo.create(model).await {
            Ok(_) => Ok(TenantAddition::Added),
            Err(AppError::Conflict(_)) => {
                tracing::debug!(listing_id = %listing_id, user_id = %user_id, "Tenant already on roster");
                Ok(TenantAddition::AlreadyTenant)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a tenant. Only the listing owner may do this.
    ///
    /// Removing a user who is not on the roster is a no-op. Tenant requests
    /// are never touched.
    pub async fn remove_tenant(&self, actor_id: &str, listing_id: &str, user_id: &str) -> AppResult<()> {
        self.guard.owned_listing(actor_id, listing_id).await?;

        let removed = self.tenant_repo.delete_by_pair(listing_id, user_id).await?;

        tracing::info!(listing_id = %listing_id, user_id = %user_id, removed, "Tenant removed");
        Ok(())
    }

    /// Whether `user_id` is a confirmed tenant of the listing. No ownership
    /// check; callers ask about their own membership.
    pub async fn is_tenant(&self, listing_id: &str, user_id: &str) -> AppResult<bool> {
        self.tenant_repo.exists(listing_id, user_id).await
    }

    /// The roster with each tenant's profile. Owner only.
    pub async fn tenants_for_listing(
        &self,
        actor_id: &str,
        listing_id: &str,
    ) -> AppResult<Vec<TenantWithProfile>> {
        self.guard.owned_listing(actor_id, listing_id).await?;
        self.tenant_repo.find_by_listing(listing_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roomshare_db::{
        entities::listing::{self, ListingStatus},
        repositories::ListingRepository,
    };
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
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

    fn service(tenant_db: MockDatabase, listing_db: MockDatabase) -> RosterService {
        RosterService::new(
            ListingTenantRepository::new(Arc::new(tenant_db.into_connection())),
            ListingGuard::new(ListingRepository::new(Arc::new(listing_db.into_connection()))),
        )
    }

    fn duplicate_key() -> DbErr {
        DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"idx_listing_tenant_listing_user\""
                .to_string(),
        ))
    }

    #[tokio::test]
    async fn test_add_tenant_twice_is_success() {
        let row = listing_tenant::Model {
            id: "t1".to_string(),
            listing_id: "l1".to_string(),
            user_id: "student".to_string(),
            added_at: Utc::now().into(),
        };

        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .append_query_errors([duplicate_key()]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        assert_eq!(
            service.add_tenant("l1", "student").await.unwrap(),
            TenantAddition::Added
        );
        assert_eq!(
            service.add_tenant("l1", "student").await.unwrap(),
            TenantAddition::AlreadyTenant
        );
    }

    #[tokio::test]
    async fn test_add_tenant_propagates_other_failures() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_errors([DbErr::Query(
                RuntimeErr::Internal("connection reset".to_string()),
            )]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.add_tenant("l1", "student").await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_remove_tenant_by_non_owner_never_deletes() {
        // No exec results are queued: a delete would fail the test.
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        let result = service.remove_tenant("intruder", "l1", "student").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_remove_tenant_on_missing_listing_is_unauthorized() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<listing::Model>::new()]),
        );

        let result = service.remove_tenant("owner", "missing", "student").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_remove_tenant_by_owner() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_listing("l1", "owner")]]),
        );

        assert!(service.remove_tenant("owner", "l1", "student").await.is_ok());
    }
}
