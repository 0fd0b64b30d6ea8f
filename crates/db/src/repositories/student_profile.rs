//! Student profile repository.

use std::sync::Arc;

use crate::entities::{StudentProfile, student_profile};
use roomshare_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Student profile repository for database operations.
#[derive(Clone)]
pub struct StudentProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentProfileRepository {
    /// Create a new student profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the profile belonging to a user.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<student_profile::Model>> {
        StudentProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
