//! HTTP API layer for roomshare.
//!
//! - **Endpoints**: RPC-style `POST` JSON endpoints
//! - **Extractors**: Authentication and validated JSON bodies
//! - **Middleware**: Bearer-token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
use middleware::{AppState, auth_middleware};

/// The API router with authentication installed, ready to be nested.
pub fn app(state: AppState) -> Router {
    router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
