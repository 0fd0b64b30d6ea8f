//! Tenant request repository.

use std::sync::Arc;

use crate::entities::{
    Listing, StudentProfile, TenantRequest, listing, student_profile,
    tenant_request::{self, TenantRequestStatus},
};
use crate::map_insert_err;
use roomshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    UpdateResult, sea_query::Expr,
};

/// Message surfaced when a student already has a request for a listing.
pub const DUPLICATE_REQUEST_MESSAGE: &str = "You already have a request for this listing";

/// A tenant request together with its parent listing.
///
/// The joined listing is zero-or-one; callers never see the join shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWithListing {
    pub request: tenant_request::Model,
    pub listing: Option<listing::Model>,
}

/// A tenant request together with the requester's profile, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWithProfile {
    pub request: tenant_request::Model,
    pub profile: Option<student_profile::Model>,
}

/// Tenant request repository for database operations.
#[derive(Clone)]
pub struct TenantRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl TenantRequestRepository {
    /// Create a new tenant request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tenant request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tenant_request::Model>> {
        TenantRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tenant request and its parent listing in one query.
    pub async fn find_with_listing(&self, id: &str) -> AppResult<Option<RequestWithListing>> {
        let row = TenantRequest::find_by_id(id)
            .find_also_related(Listing)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|(request, listing)| RequestWithListing { request, listing }))
    }

    /// Find the request a student made for a listing.
    pub async fn find_by_pair(
        &self,
        listing_id: &str,
        requester_id: &str,
    ) -> AppResult<Option<tenant_request::Model>> {
        TenantRequest::find()
            .filter(tenant_request::Column::ListingId.eq(listing_id))
            .filter(tenant_request::Column::RequesterId.eq(requester_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tenant request.
    ///
    /// A second request for the same (listing, requester) pair is rejected
    /// by the unique index and surfaces as [`AppError::Conflict`].
    pub async fn create(
        &self,
        model: tenant_request::ActiveModel,
    ) -> AppResult<tenant_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_insert_err(e, DUPLICATE_REQUEST_MESSAGE))
    }

    /// Move a pending request to `status`.
    ///
    /// The update only matches rows that are still pending, so of two racing
    /// transitions exactly one reports a changed row.
    pub async fn transition_from_pending(
        &self,
        id: &str,
        status: TenantRequestStatus,
    ) -> AppResult<u64> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result: UpdateResult = TenantRequest::update_many()
            .col_expr(tenant_request::Column::Status, Expr::value(status))
            .col_expr(tenant_request::Column::UpdatedAt, Expr::value(now))
            .filter(tenant_request::Column::Id.eq(id))
            .filter(tenant_request::Column::Status.eq(TenantRequestStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Get pending requests for a listing, oldest first, with requester profiles.
    pub async fn find_pending_for_listing(
        &self,
        listing_id: &str,
    ) -> AppResult<Vec<RequestWithProfile>> {
        let rows = TenantRequest::find()
            .find_also_related(StudentProfile)
            .filter(tenant_request::Column::ListingId.eq(listing_id))
            .filter(tenant_request::Column::Status.eq(TenantRequestStatus::Pending))
            .order_by_asc(tenant_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(request, profile)| RequestWithProfile { request, profile })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::listing::ListingStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr, Set};

    fn create_test_request(id: &str, listing_id: &str, requester_id: &str) -> tenant_request::Model {
        tenant_request::Model {
            id: id.to_string(),
            listing_id: listing_id.to_string(),
            requester_id: requester_id.to_string(),
            status: TenantRequestStatus::Pending,
            message: Some("Hi, interested!".to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_listing(id: &str, lister_id: &str) -> listing::Model {
        listing::Model {
            id: id.to_string(),
            lister_id: lister_id.to_string(),
            title: "Room near campus".to_string(),
            description: None,
            city: "Leeds".to_string(),
            max_occupants: 3,
            status: ListingStatus::Active,
            contact_phone: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn active_model(request: &tenant_request::Model) -> tenant_request::ActiveModel {
        tenant_request::ActiveModel {
            id: Set(request.id.clone()),
            listing_id: Set(request.listing_id.clone()),
            requester_id: Set(request.requester_id.clone()),
            status: Set(TenantRequestStatus::Pending),
            message: Set(request.message.clone()),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
    }

    #[tokio::test]
    async fn test_find_with_listing() {
        let request = create_test_request("r1", "l1", "student");
        let listing = create_test_listing("l1", "owner");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[(request.clone(), listing.clone())]])
                .into_connection(),
        );

        let repo = TenantRequestRepository::new(db);
        let found = repo.find_with_listing("r1").await.unwrap().unwrap();

        assert_eq!(found.request, request);
        assert_eq!(found.listing, Some(listing));
    }

    #[tokio::test]
    async fn test_create() {
        let request = create_test_request("r1", "l1", "student");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()]])
                .into_connection(),
        );

        let repo = TenantRequestRepository::new(db);
        let created = repo.create(active_model(&request)).await.unwrap();

        assert_eq!(created.status, TenantRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let request = create_test_request("r2", "l1", "student");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint \"idx_tenant_request_listing_requester\""
                        .to_string(),
                ))])
                .into_connection(),
        );

        let repo = TenantRequestRepository::new(db);
        let result = repo.create(active_model(&request)).await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, DUPLICATE_REQUEST_MESSAGE),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transition_from_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = TenantRequestRepository::new(db);

        let first = repo
            .transition_from_pending("r1", TenantRequestStatus::Accepted)
            .await
            .unwrap();
        let second = repo
            .transition_from_pending("r1", TenantRequestStatus::Rejected)
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }
}
