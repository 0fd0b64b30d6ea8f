//! HTTP client for the roomshare API.
//!
//! Every endpoint is a `POST` with a JSON body. The server answers with an
//! `error` field that is `null` on success; any other value is a
//! confirmed rejection carrying a message meant for the user. A server
//! error without that field is reported as [`ClientError::Unconfirmed`].

#![allow(missing_docs)]

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use crate::error::ClientError;
use crate::types::{
    Envelope, Listing, Notification, PendingRequest, RequestStatus, Tenant, UnreadCount,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated API client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the API mounted at `base_url` (e.g. `http://host/api`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("roomshare-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the bearer token sent with every call.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn send<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Calling API");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }

    /// Call an endpoint and decode its envelope.
    async fn call<B, T>(&self, path: &str, body: &B) -> Result<Option<T>, ClientError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        let status = response.status();

        // Our own error bodies are always `{"error": "..."}`. A 4xx without
        // one (e.g. an empty 404) is still a refusal; a 5xx without one came
        // from something in front of the API and proves nothing.
        if !status.is_success() {
            let message = response
                .json::<Envelope<Value>>()
                .await
                .ok()
                .and_then(|e| e.error);
            return Err(match message {
                Some(message) => ClientError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                None if status.is_server_error() => ClientError::Unconfirmed {
                    status: status.as_u16(),
                },
                None => ClientError::Rejected {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Request failed").to_string(),
                },
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        if let Some(message) = envelope.error {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(envelope.data)
    }

    async fn mutate<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        self.call::<B, Value>(path, body).await.map(|_| ())
    }

    async fn query<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Default,
    {
        Ok(self.call(path, body).await?.unwrap_or_default())
    }

    // === Tenant requests ===

    pub async fn submit_request(
        &self,
        listing_id: &str,
        message: Option<&str>,
    ) -> Result<(), ClientError> {
        self.mutate(
            "/tenant-requests/create",
            &json!({ "listingId": listing_id, "message": message }),
        )
        .await
    }

    pub async fn accept_request(&self, request_id: &str) -> Result<(), ClientError> {
        self.mutate(
            "/tenant-requests/accept",
            &json!({ "requestId": request_id }),
        )
        .await
    }

    pub async fn reject_request(&self, request_id: &str) -> Result<(), ClientError> {
        self.mutate(
            "/tenant-requests/reject",
            &json!({ "requestId": request_id }),
        )
        .await
    }

    pub async fn pending_requests(
        &self,
        listing_id: &str,
    ) -> Result<Vec<PendingRequest>, ClientError> {
        self.query(
            "/tenant-requests/pending",
            &json!({ "listingId": listing_id }),
        )
        .await
    }

    pub async fn request_status(&self, listing_id: &str) -> Result<RequestStatus, ClientError> {
        let status = self
            .call(
                "/tenant-requests/status",
                &json!({ "listingId": listing_id }),
            )
            .await?;
        Ok(status.unwrap_or(RequestStatus::None))
    }

    // === Roster ===

    pub async fn tenants(&self, listing_id: &str) -> Result<Vec<Tenant>, ClientError> {
        self.query("/tenants/list", &json!({ "listingId": listing_id }))
            .await
    }

    pub async fn remove_tenant(&self, listing_id: &str, user_id: &str) -> Result<(), ClientError> {
        self.mutate(
            "/tenants/remove",
            &json!({ "listingId": listing_id, "userId": user_id }),
        )
        .await
    }

    // === Listings ===

    pub async fn my_listings(&self) -> Result<Vec<Listing>, ClientError> {
        self.query("/listings/mine", &json!({})).await
    }

    pub async fn update_contact_phone(
        &self,
        listing_id: &str,
        contact_phone: Option<&str>,
    ) -> Result<(), ClientError> {
        self.mutate(
            "/listings/update-contact-phone",
            &json!({ "listingId": listing_id, "contactPhone": contact_phone }),
        )
        .await
    }

    pub async fn archive_listing(&self, listing_id: &str) -> Result<(), ClientError> {
        self.mutate("/listings/archive", &json!({ "listingId": listing_id }))
            .await
    }

    // === Notifications ===

    pub async fn notifications(
        &self,
        limit: Option<u64>,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> Result<Vec<Notification>, ClientError> {
        self.query(
            "/notifications/list",
            &json!({ "limit": limit, "untilId": until_id, "unreadOnly": unread_only }),
        )
        .await
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ClientError> {
        self.mutate(
            "/notifications/mark-as-read",
            &json!({ "notificationId": notification_id }),
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        self.mutate("/notifications/mark-all-as-read", &json!({}))
            .await
    }

    pub async fn unread_count(&self) -> Result<u64, ClientError> {
        let count: Option<UnreadCount> = self.call("/notifications/unread-count", &json!({})).await?;
        Ok(count.map_or(0, |c| c.count))
    }
}
