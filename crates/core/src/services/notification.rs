//! Notification service.
//!
//! Notifications are a side effect of tenant-request transitions. Creating
//! one is best-effort: callers log a failed [`NotificationService::notify`]
//! with `tracing::warn!` and carry on, so a lost notification never undoes
//! the transition that produced it.

use roomshare_common::{AppError, AppResult, IdGenerator, config::MAX_NOTIFICATION_PAGE};
use roomshare_db::{
    entities::{
        listing,
        notification::{self, NotificationType},
    },
    repositories::NotificationRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Name used when the requester has no readable profile.
pub const FALLBACK_REQUESTER_NAME: &str = "A student";

/// Structured payload stored alongside a notification.
///
/// These are plain values, not foreign keys; they outlive the listing or
/// request they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMetadata {
    pub listing_id: String,
    pub listing_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
}

impl NotificationMetadata {
    fn for_request(listing: &listing::Model, request_id: &str) -> Self {
        Self {
            listing_id: listing.id.clone(),
            listing_title: listing.title.clone(),
            request_id: Some(request_id.to_string()),
            requester_name: None,
        }
    }
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    page_limit: u64,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            page_limit: MAX_NOTIFICATION_PAGE,
            id_gen: IdGenerator::new(),
        }
    }

    /// Override the default page size (still capped at [`MAX_NOTIFICATION_PAGE`]).
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: u64) -> Self {
        self.page_limit = page_limit.clamp(1, MAX_NOTIFICATION_PAGE);
        self
    }

    /// Create one notification row.
    pub async fn notify(
        &self,
        recipient_id: &str,
        notification_type: NotificationType,
        title: &str,
        body: &str,
        metadata: &NotificationMetadata,
    ) -> AppResult<notification::Model> {
        let metadata =
            serde_json::to_value(metadata).map_err(|e| AppError::Internal(e.to_string()))?;

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(recipient_id.to_string()),
            notification_type: Set(notification_type),
            title: Set(title.to_string()),
            body: Set(Some(body.to_string())),
            metadata: Set(Some(metadata)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.notification_repo.create(model).await?;

        tracing::debug!(
            notification_id = %created.id,
            recipient_id = %recipient_id,
            kind = notification_type.as_str(),
            "Notification created"
        );

        Ok(created)
    }

    /// Tell a lister that a student asked to join their listing.
    pub async fn tenant_request_received(
        &self,
        lister_id: &str,
        requester_name: Option<&str>,
        listing: &listing::Model,
        request_id: &str,
    ) -> AppResult<notification::Model> {
        let name = requester_name.unwrap_or(FALLBACK_REQUESTER_NAME);
        let body = format!(
            "{name} wants to be listed as a tenant on \"{}\"",
            listing.title
        );
        let metadata = NotificationMetadata {
            requester_name: requester_name.map(ToString::to_string),
            ..NotificationMetadata::for_request(listing, request_id)
        };

        self.notify(
            lister_id,
            NotificationType::TenantRequestReceived,
            "New tenant request",
            &body,
            &metadata,
        )
        .await
    }

    /// Tell a student their request was accepted.
    pub async fn request_accepted(
        &self,
        requester_id: &str,
        listing: &listing::Model,
        request_id: &str,
    ) -> AppResult<notification::Model> {
        let body = format!("You've been added as a tenant on \"{}\"", listing.title);

        self.notify(
            requester_id,
            NotificationType::RequestAccepted,
            "Tenant request accepted",
            &body,
            &NotificationMetadata::for_request(listing, request_id),
        )
        .await
    }

    /// Tell a student their request was declined.
    pub async fn request_rejected(
        &self,
        requester_id: &str,
        listing: &listing::Model,
        request_id: &str,
    ) -> AppResult<notification::Model> {
        let body = format!(
            "Your request to be listed as a tenant on \"{}\" was declined",
            listing.title
        );

        self.notify(
            requester_id,
            NotificationType::RequestRejected,
            "Tenant request declined",
            &body,
            &NotificationMetadata::for_request(listing, request_id),
        )
        .await
    }

    /// Get notifications for a user, newest first.
    pub async fn get_notifications(
        &self,
        user_id: &str,
        limit: Option<u64>,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        let limit = limit.map_or(self.page_limit, |l| l.clamp(1, self.page_limit));
        self.notification_repo
            .find_by_user(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark a notification as read.
    ///
    /// Scoped to the recipient; another user's notification is left alone
    /// and the call still succeeds.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let changed = self
            .notification_repo
            .mark_as_read_for_user(notification_id, user_id)
            .await?;

        if changed == 0 {
            tracing::debug!(notification_id = %notification_id, user_id = %user_id, "Nothing to mark as read");
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roomshare_db::entities::listing::ListingStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};
    use std::sync::Arc;

    fn create_test_listing() -> listing::Model {
        listing::Model {
            id: "l1".to_string(),
            lister_id: "owner".to_string(),
            title: "Sunny double room".to_string(),
            description: None,
            city: "Leeds".to_string(),
            max_occupants: 3,
            status: ListingStatus::Active,
            contact_phone: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn stored(
        user_id: &str,
        notification_type: NotificationType,
        body: &str,
        metadata: serde_json::Value,
    ) -> notification::Model {
        notification::Model {
            id: "n1".to_string(),
            user_id: user_id.to_string(),
            notification_type,
            title: "t".to_string(),
            body: Some(body.to_string()),
            metadata: Some(metadata),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    fn inserted_sql(log: &[Transaction]) -> String {
        format!("{:?}", log.first().unwrap())
    }

    #[test]
    fn test_metadata_omits_absent_fields() {
        let metadata = NotificationMetadata::for_request(&create_test_listing(), "r1");
        let value = serde_json::to_value(&metadata).unwrap();

        assert_eq!(value["listing_id"], "l1");
        assert_eq!(value["request_id"], "r1");
        assert!(value.get("requester_name").is_none());
    }

    #[tokio::test]
    async fn test_tenant_request_received_falls_back_to_generic_name() {
        let listing = create_test_listing();
        let expected_body = "A student wants to be listed as a tenant on \"Sunny double room\"";

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored(
                    "owner",
                    NotificationType::TenantRequestReceived,
                    expected_body,
                    serde_json::json!({ "listing_id": "l1" }),
                )]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db.clone()));
        let created = service
            .tenant_request_received("owner", None, &listing, "r1")
            .await
            .unwrap();

        assert_eq!(created.user_id, "owner");
        drop(service);
        let db = Arc::into_inner(db).unwrap();
        let sql = inserted_sql(&db.into_transaction_log());
        assert!(sql.contains(&format!("{expected_body:?}")));
        assert!(sql.contains("New tenant request"));
    }

    #[tokio::test]
    async fn test_notify_stores_metadata_object() {
        let listing = create_test_listing();
        let metadata = NotificationMetadata::for_request(&listing, "r1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored(
                    "student",
                    NotificationType::RequestAccepted,
                    "body",
                    serde_json::json!({ "listing_id": "l1", "request_id": "r1" }),
                )]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db.clone()));
        service
            .notify("student", NotificationType::RequestAccepted, "t", "body", &metadata)
            .await
            .unwrap();

        drop(service);
        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let values = log[0].statements()[0].values.clone().unwrap().0;
        let stored_metadata = values
            .into_iter()
            .find_map(|v| match v {
                sea_orm::Value::Json(Some(json)) => Some(*json),
                _ => None,
            })
            .unwrap();
        assert_eq!(stored_metadata, serde_json::to_value(&metadata).unwrap());
    }

    #[tokio::test]
    async fn test_request_rejected_body() {
        let listing = create_test_listing();
        let expected_body = "Your request to be listed as a tenant on \"Sunny double room\" was declined";

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored(
                    "student",
                    NotificationType::RequestRejected,
                    expected_body,
                    serde_json::json!({ "listing_id": "l1", "request_id": "r1" }),
                )]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db.clone()));
        service
            .request_rejected("student", &listing, "r1")
            .await
            .unwrap();

        drop(service);
        let db = Arc::into_inner(db).unwrap();
        let sql = inserted_sql(&db.into_transaction_log());
        assert!(sql.contains(&format!("{expected_body:?}")));
        assert!(sql.contains("request_rejected"));
    }

    #[tokio::test]
    async fn test_mark_as_read_for_other_user_is_silent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        assert!(service.mark_as_read("intruder", "n1").await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_all_as_read_is_idempotent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));

        assert_eq!(service.mark_all_as_read("student").await.unwrap(), 2);
        assert_eq!(service.mark_all_as_read("student").await.unwrap(), 0);
    }

    #[test]
    fn test_page_limit_is_capped() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service =
            NotificationService::new(NotificationRepository::new(db)).with_page_limit(500);

        assert_eq!(service.page_limit, MAX_NOTIFICATION_PAGE);
    }
}
