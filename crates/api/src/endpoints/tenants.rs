//! Tenant roster endpoints.

use axum::{Json, Router, extract::State, routing::post};
use roomshare_common::AppResult;
use roomshare_db::{entities::student_profile, repositories::TenantWithProfile};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Profile columns embedded in roster and pending-request reads.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub university_name: String,
    pub major: String,
}

impl From<student_profile::Model> for ProfileResponse {
    fn from(p: student_profile::Model) -> Self {
        Self {
            full_name: p.full_name,
            avatar_url: p.avatar_url,
            university_name: p.university_name,
            major: p.major,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: String,
    pub user_id: String,
    pub added_at: String,
    pub profile: Option<ProfileResponse>,
}

impl From<TenantWithProfile> for TenantResponse {
    fn from(t: TenantWithProfile) -> Self {
        Self {
            id: t.tenant.id,
            user_id: t.tenant.user_id,
            added_at: t.tenant.added_at.to_rfc3339(),
            profile: t.profile.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsRequest {
    pub listing_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTenantRequest {
    pub listing_id: String,
    pub user_id: String,
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListTenantsRequest>,
) -> AppResult<ApiResponse<Vec<TenantResponse>>> {
    let tenants = state
        .roster_service
        .tenants_for_listing(&user.id, &req.listing_id)
        .await?;
    Ok(ApiResponse::ok(tenants.into_iter().map(Into::into).collect()))
}

/// Remove a confirmed tenant from one of the caller's listings.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RemoveTenantRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .roster_service
        .remove_tenant(&user.id, &req.listing_id, &req.user_id)
        .await?;
    Ok(ApiResponse::done())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/remove", post(remove))
}
