//! API endpoints.
//!
//! RPC-style: every operation is a `POST` with a JSON body.

mod listings;
mod notifications;
mod tenant_requests;
mod tenants;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/tenant-requests", tenant_requests::router())
        .nest("/tenants", tenants::router())
        .nest("/listings", listings::router())
        .nest("/notifications", notifications::router())
}
