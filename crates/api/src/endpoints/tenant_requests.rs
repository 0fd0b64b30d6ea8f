//! Tenant request endpoints.

use axum::{Json, Router, extract::State, routing::post};
use roomshare_common::AppResult;
use roomshare_core::RequestStatusView;
use roomshare_db::repositories::RequestWithProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    endpoints::tenants::ProfileResponse,
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Submit request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[validate(length(min = 1))]
    pub listing_id: String,
    #[validate(length(max = 300))]
    pub message: Option<String>,
}

/// Accept/reject request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdRequest {
    pub request_id: String,
}

/// Request scoped to one listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingIdRequest {
    pub listing_id: String,
}

/// Pending request with the requester's profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestResponse {
    pub id: String,
    pub requester_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: String,
    pub profile: Option<ProfileResponse>,
}

impl From<RequestWithProfile> for PendingRequestResponse {
    fn from(r: RequestWithProfile) -> Self {
        Self {
            id: r.request.id,
            requester_id: r.request.requester_id,
            status: "pending".to_string(),
            message: r.request.message,
            created_at: r.request.created_at.to_rfc3339(),
            profile: r.profile.map(Into::into),
        }
    }
}

/// Submit a tenant request.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SubmitRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .tenant_request_service
        .submit(&user.id, &req.listing_id, req.message)
        .await?;
    Ok(ApiResponse::done())
}

/// Accept a tenant request.
async fn accept(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RequestIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .tenant_request_service
        .accept(&user.id, &req.request_id)
        .await?;
    Ok(ApiResponse::done())
}

/// Reject a tenant request.
async fn reject(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RequestIdRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .tenant_request_service
        .reject(&user.id, &req.request_id)
        .await?;
    Ok(ApiResponse::done())
}

/// Pending requests for one of the caller's listings, oldest first.
async fn pending(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListingIdRequest>,
) -> AppResult<ApiResponse<Vec<PendingRequestResponse>>> {
    let requests = state
        .tenant_request_service
        .pending_for_listing(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(requests.into_iter().map(Into::into).collect()))
}

/// The caller's own request status for a listing.
async fn status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListingIdRequest>,
) -> AppResult<ApiResponse<RequestStatusView>> {
    let view = state
        .tenant_request_service
        .status_for_user(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(view))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/accept", post(accept))
        .route("/reject", post(reject))
        .route("/pending", post(pending))
        .route("/status", post(status))
}
