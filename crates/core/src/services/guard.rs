//! Authorization guard.
//!
//! Every mutating operation resolves the owner of the resource it touches
//! and compares it with the acting identity before writing anything.
//! Decisions are never cached; each call re-reads the owner.

use roomshare_common::{AppError, AppResult};
use roomshare_db::{entities::listing, repositories::ListingRepository};

/// Resolve the acting identity, failing with [`AppError::NotAuthenticated`]
/// when there is none.
pub fn require_identity<T>(actor: Option<T>) -> AppResult<T> {
    actor.ok_or(AppError::NotAuthenticated)
}

/// Fail with [`AppError::Unauthorized`] unless `actor_id` owns the resource.
pub fn ensure_owner(actor_id: &str, owner_id: &str) -> AppResult<()> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Ownership checks for listing-scoped mutations.
#[derive(Clone)]
pub struct ListingGuard {
    listing_repo: ListingRepository,
}

impl ListingGuard {
    #[must_use]
    pub const fn new(listing_repo: ListingRepository) -> Self {
        Self { listing_repo }
    }

    /// Load a listing the actor owns.
    ///
    /// A missing listing is reported as [`AppError::Unauthorized`] so callers
    /// cannot probe which listing IDs exist.
    pub async fn owned_listing(&self, actor_id: &str, listing_id: &str) -> AppResult<listing::Model> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        ensure_owner(actor_id, &listing.lister_id)?;
        Ok(listing)
    }
}
