//! Lister-side listing endpoints.

use axum::{Json, Router, extract::State, routing::post};
use roomshare_common::AppResult;
use roomshare_core::ListingWithTenantCount;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::{AuthUser, ValidatedJson},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactPhoneRequest {
    #[validate(length(min = 1))]
    pub listing_id: String,
    #[validate(length(max = 30))]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    pub listing_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub city: String,
    pub status: String,
    pub max_occupants: i32,
    pub contact_phone: Option<String>,
    pub tenant_count: u64,
    pub created_at: String,
}

impl From<ListingWithTenantCount> for ListingResponse {
    fn from(l: ListingWithTenantCount) -> Self {
        let status = serde_json::to_value(l.listing.status)
            .ok()
            .and_then(|v| v.as_str().map(ToString::to_string))
            .unwrap_or_default();

        Self {
            id: l.listing.id,
            title: l.listing.title,
            city: l.listing.city,
            status,
            max_occupants: l.listing.max_occupants,
            contact_phone: l.listing.contact_phone,
            tenant_count: l.tenant_count,
            created_at: l.listing.created_at.to_rfc3339(),
        }
    }
}

/// The caller's non-archived listings, newest first.
async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ListingResponse>>> {
    let listings = state.listing_service.listings_for_lister(&user.id).await?;
    Ok(ApiResponse::ok(listings.into_iter().map(Into::into).collect()))
}

async fn update_contact_phone(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateContactPhoneRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .listing_service
        .update_contact_phone(&user.id, &req.listing_id, req.contact_phone.as_deref())
        .await?;
    Ok(ApiResponse::done())
}

async fn archive(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ArchiveRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .listing_service
        .archive(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::done())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", post(mine))
        .route("/update-contact-phone", post(update_contact_phone))
        .route("/archive", post(archive))
}
