//! User service.

use roomshare_common::{AppError, AppResult};
use roomshare_db::{
    entities::{student_profile, user},
    repositories::{StudentProfileRepository, UserRepository},
};

/// Resolves bearer tokens and profiles issued by the authentication provider.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: StudentProfileRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, profile_repo: StudentProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
        }
    }

    /// Authenticate a user by token.
    ///
    /// An unknown token is the same as no identity at all.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::NotAuthenticated)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get a user's student profile, if they have one.
    pub async fn profile(&self, user_id: &str) -> AppResult<Option<student_profile::Model>> {
        self.profile_repo.find_by_user_id(user_id).await
    }
}
