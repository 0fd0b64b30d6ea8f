//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use roomshare_common::AppError;
use roomshare_core::guard::require_identity;
use roomshare_db::entities::user;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Authenticated user extractor.
///
/// The user is placed in request extensions by the auth middleware; a
/// request without one is rejected with "Not authenticated".
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_identity(parts.extensions.get::<user::Model>().cloned()).map(AuthUser)
    }
}

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON and failed validation both become [`AppError::Validation`],
/// which renders as "Invalid data".
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
