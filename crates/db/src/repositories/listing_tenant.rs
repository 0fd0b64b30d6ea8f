//! Listing tenant (roster) repository.

use std::sync::Arc;

use crate::entities::{ListingTenant, StudentProfile, listing_tenant, student_profile};
use crate::map_insert_err;
use roomshare_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DeleteResult, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// A roster row together with the tenant's student profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantWithProfile {
    pub tenant: listing_tenant::Model,
    pub profile: Option<student_profile::Model>,
}

/// Listing tenant repository for database operations.
#[derive(Clone)]
pub struct ListingTenantRepository {
    db: Arc<DatabaseConnection>,
}

impl ListingTenantRepository {
    /// Create a new listing tenant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user is on a listing's roster.
    pub async fn exists(&self, listing_id: &str, user_id: &str) -> AppResult<bool> {
        let count = ListingTenant::find()
            .filter(listing_tenant::Column::ListingId.eq(listing_id))
            .filter(listing_tenant::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Insert a roster row.
    ///
    /// Returns [`AppError::Conflict`] when the pair is already present.
    pub async fn create(
        &self,
        model: listing_tenant::ActiveModel,
    ) -> AppResult<listing_tenant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_insert_err(e, "User is already a tenant of this listing"))
    }

    /// Delete the roster row for a (listing, user) pair.
    pub async fn delete_by_pair(&self, listing_id: &str, user_id: &str) -> AppResult<u64> {
        let result: DeleteResult = ListingTenant::delete_many()
            .filter(listing_tenant::Column::ListingId.eq(listing_id))
            .filter(listing_tenant::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Get a listing's roster in the order tenants were added.
    pub async fn find_by_listing(&self, listing_id: &str) -> AppResult<Vec<TenantWithProfile>> {
        let rows = ListingTenant::find()
            .find_also_related(StudentProfile)
            .filter(listing_tenant::Column::ListingId.eq(listing_id))
            .order_by_asc(listing_tenant::Column::AddedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(tenant, profile)| TenantWithProfile { tenant, profile })
            .collect())
    }
}
