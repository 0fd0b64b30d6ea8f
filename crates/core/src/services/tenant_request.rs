//! Tenant request service.
//!
//! A request moves `pending -> accepted` or `pending -> rejected` and never
//! leaves a terminal state. Accepting writes the roster row first, then the
//! status, then the notification. The three writes are not atomic: a crash
//! after the roster insert leaves a pending request whose retry converges,
//! because the roster insert is idempotent.

use crate::services::{
    guard::ensure_owner,
    notification::NotificationService,
    roster::{RosterService, TenantAddition},
};
use roomshare_common::{AppError, AppResult, IdGenerator};
use roomshare_db::{
    entities::{
        listing,
        tenant_request::{self, TenantRequestStatus},
    },
    repositories::{
        ListingRepository, RequestWithProfile, StudentProfileRepository, TenantRequestRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

const ALREADY_PROCESSED: &str = "This request has already been processed";

/// What a student sees about their relationship to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatusView {
    /// Already on the roster; request history is not consulted.
    IsTenant,
    /// No request and no tenancy.
    None,
    Pending { request_id: String },
    Accepted { request_id: String },
    Rejected { request_id: String },
}

impl RequestStatusView {
    fn from_request(request: &tenant_request::Model) -> Self {
        let request_id = request.id.clone();
        match request.status {
            TenantRequestStatus::Pending => Self::Pending { request_id },
            TenantRequestStatus::Accepted => Self::Accepted { request_id },
            TenantRequestStatus::Rejected => Self::Rejected { request_id },
        }
    }
}

/// Tenant request service for business logic.
#[derive(Clone)]
pub struct TenantRequestService {
    request_repo: TenantRequestRepository,
    listing_repo: ListingRepository,
    profile_repo: StudentProfileRepository,
    roster: RosterService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl TenantRequestService {
    /// Create a new tenant request service.
    #[must_use]
    pub const fn new(
        request_repo: TenantRequestRepository,
        listing_repo: ListingRepository,
        profile_repo: StudentProfileRepository,
        roster: RosterService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            request_repo,
            listing_repo,
            profile_repo,
            roster,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a request to become a tenant of a listing.
    pub async fn submit(
        &self,
        requester_id: &str,
        listing_id: &str,
        message: Option<String>,
    ) -> AppResult<tenant_request::Model> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        if listing.lister_id == requester_id {
            return Err(AppError::InvalidOperation(
                "You cannot request your own listing".to_string(),
            ));
        }

        if !listing.accepts_tenant_requests() {
            return Err(AppError::InvalidOperation(
                "This listing does not support tenant requests".to_string(),
            ));
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = tenant_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            listing_id: Set(listing.id.clone()),
            requester_id: Set(requester_id.to_string()),
            status: Set(TenantRequestStatus::Pending),
            message: Set(message.filter(|m| !m.trim().is_empty())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let request = self.request_repo.create(model).await?;

        tracing::info!(
            request_id = %request.id,
            listing_id = %listing.id,
            requester_id = %requester_id,
            "Tenant request submitted"
        );

        let requester_name = match self.profile_repo.find_by_user_id(requester_id).await {
            Ok(profile) => profile.map(|p| p.full_name),
            Err(e) => {
                tracing::warn!(error = %e, requester_id = %requester_id, "Failed to load requester profile");
                None
            }
        };

        if let Err(e) = self
            .notifications
            .tenant_request_received(
                &listing.lister_id,
                requester_name.as_deref(),
                &listing,
                &request.id,
            )
            .await
        {
            tracing::warn!(error = %e, request_id = %request.id, "Failed to notify lister of tenant request");
        }

        Ok(request)
    }

    /// Accept a pending request. Only the listing owner may do this.
    pub async fn accept(&self, actor_id: &str, request_id: &str) -> AppResult<()> {
        let (request, listing) = self.load_for_owner(actor_id, request_id).await?;

        let addition = self
            .roster
            .add_tenant(&request.listing_id, &request.requester_id)
            .await?;
        if addition == TenantAddition::AlreadyTenant {
            tracing::debug!(request_id = %request_id, "Requester was already on the roster");
        }

        self.transition(&request, TenantRequestStatus::Accepted).await?;

        if let Err(e) = self
            .notifications
            .request_accepted(&request.requester_id, &listing, &request.id)
            .await
        {
            tracing::warn!(error = %e, request_id = %request_id, "Failed to notify requester of acceptance");
        }

        Ok(())
    }

    /// Reject a pending request. Only the listing owner may do this.
    pub async fn reject(&self, actor_id: &str, request_id: &str) -> AppResult<()> {
        let (request, listing) = self.load_for_owner(actor_id, request_id).await?;

        self.transition(&request, TenantRequestStatus::Rejected).await?;

        if let Err(e) = self
            .notifications
            .request_rejected(&request.requester_id, &listing, &request.id)
            .await
        {
            tracing::warn!(error = %e, request_id = %request_id, "Failed to notify requester of rejection");
        }

        Ok(())
    }

    /// Load a request with its listing and check the actor owns the listing
    /// and the request is still pending.
    async fn load_for_owner(
        &self,
        actor_id: &str,
        request_id: &str,
    ) -> AppResult<(tenant_request::Model, listing::Model)> {
        let found = self
            .request_repo
            .find_with_listing(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        // A request whose listing cannot be read has no owner to match.
        let listing = found.listing.ok_or(AppError::Unauthorized)?;
        ensure_owner(actor_id, &listing.lister_id)?;

        if found.request.status.is_terminal() {
            return Err(AppError::InvalidOperation(ALREADY_PROCESSED.to_string()));
        }

        Ok((found.request, listing))
    }

    async fn transition(
        &self,
        request: &tenant_request::Model,
        status: TenantRequestStatus,
    ) -> AppResult<()> {
        let changed = self
            .request_repo
            .transition_from_pending(&request.id, status)
            .await?;

        if changed == 0 {
            return Err(AppError::InvalidOperation(ALREADY_PROCESSED.to_string()));
        }

        tracing::info!(
            request_id = %request.id,
            listing_id = %request.listing_id,
            status = ?status,
            "Tenant request transitioned"
        );
        Ok(())
    }

    /// The actor's tenancy or request status for a listing.
    pub async fn status_for_user(&self, user_id: &str, listing_id: &str) -> AppResult<RequestStatusView> {
        if self.roster.is_tenant(listing_id, user_id).await? {
            return Ok(RequestStatusView::IsTenant);
        }

        Ok(self
            .request_repo
            .find_by_pair(listing_id, user_id)
            .await?
            .map_or(RequestStatusView::None, |r| RequestStatusView::from_request(&r)))
    }

    /// Pending requests for a listing, oldest first. Owner only.
    pub async fn pending_for_listing(
        &self,
        actor_id: &str,
        listing_id: &str,
    ) -> AppResult<Vec<RequestWithProfile>> {
        let listing = self
            .listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        ensure_owner(actor_id, &listing.lister_id)?;

        self.request_repo.find_pending_for_listing(listing_id).await
    }
}
