//! Cached API access for one signed-in user.
//!
//! Reads are served from [`QueryCache`] while fresh. Mutations go straight
//! to the server and, once the server has answered, drop every cached
//! collection they could have changed. Archiving a listing is applied to
//! the cache before the server answers and rolled back only when the
//! server refuses it.

#![allow(missing_docs)]

use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cache::{CacheKey, Mutation, QueryCache};
use crate::error::ClientError;
use crate::types::{Listing, Notification, PendingRequest, RequestStatus, Tenant};

/// API client with a query cache in front of it.
pub struct SyncClient {
    api: ApiClient,
    user_id: String,
    cache: Mutex<QueryCache>,
}

impl SyncClient {
    /// `user_id` is the account the client's token belongs to.
    #[must_use]
    pub fn new(api: ApiClient, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            cache: Mutex::new(QueryCache::new()),
        }
    }

    /// Run `f` against the cache.
    pub async fn with_cache<R>(&self, f: impl FnOnce(&mut QueryCache) -> R) -> R {
        let mut cache = self.cache.lock().await;
        f(&mut cache)
    }

    async fn cached<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(hit) = self.cache.lock().await.get(&key) {
            debug!(key = ?key, "Cache hit");
            return Ok(hit);
        }

        let value = fetch().await?;
        self.cache.lock().await.put(key, &value);
        Ok(value)
    }

    /// Apply a mutation's outcome to the cache.
    ///
    /// A rejection changed nothing on the server. A transport failure or an
    /// unconfirmed server error may or may not have been applied, so the
    /// affected entries are dropped as if it had succeeded.
    async fn settle(
        &self,
        mutation: Mutation,
        result: Result<(), ClientError>,
    ) -> Result<(), ClientError> {
        match &result {
            Err(e) if e.is_rejection() => {}
            _ => {
                self.cache.lock().await.invalidate(&mutation);
            }
        }
        result
    }

    // === Reads ===

    pub async fn my_listings(&self) -> Result<Vec<Listing>, ClientError> {
        self.cached(CacheKey::ListerListings, || self.api.my_listings())
            .await
    }

    pub async fn tenants(&self, listing_id: &str) -> Result<Vec<Tenant>, ClientError> {
        let key = CacheKey::Tenants {
            listing_id: listing_id.to_string(),
        };
        self.cached(key, || self.api.tenants(listing_id)).await
    }

    pub async fn pending_requests(
        &self,
        listing_id: &str,
    ) -> Result<Vec<PendingRequest>, ClientError> {
        let key = CacheKey::PendingRequests {
            listing_id: listing_id.to_string(),
        };
        self.cached(key, || self.api.pending_requests(listing_id))
            .await
    }

    pub async fn request_status(&self, listing_id: &str) -> Result<RequestStatus, ClientError> {
        let key = CacheKey::RequestStatus {
            listing_id: listing_id.to_string(),
            user_id: self.user_id.clone(),
        };
        self.cached(key, || self.api.request_status(listing_id))
            .await
    }

    /// First page of the caller's notifications.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        let key = CacheKey::Notifications {
            user_id: self.user_id.clone(),
        };
        self.cached(key, || self.api.notifications(None, None, false))
            .await
    }

    pub async fn unread_count(&self) -> Result<u64, ClientError> {
        let key = CacheKey::UnreadCount {
            user_id: self.user_id.clone(),
        };
        self.cached(key, || self.api.unread_count()).await
    }

    // === Mutations ===

    pub async fn submit_request(
        &self,
        listing_id: &str,
        message: Option<&str>,
    ) -> Result<(), ClientError> {
        let result = self.api.submit_request(listing_id, message).await;
        self.settle(
            Mutation::SubmitRequest {
                listing_id: listing_id.to_string(),
                requester_id: self.user_id.clone(),
            },
            result,
        )
        .await
    }

    /// Accept a request on `listing_id`.
    pub async fn accept_request(&self, listing_id: &str, request_id: &str) -> Result<(), ClientError> {
        let result = self.api.accept_request(request_id).await;
        self.settle(
            Mutation::AcceptRequest {
                listing_id: listing_id.to_string(),
            },
            result,
        )
        .await
    }

    /// Reject a request on `listing_id`.
    pub async fn reject_request(&self, listing_id: &str, request_id: &str) -> Result<(), ClientError> {
        let result = self.api.reject_request(request_id).await;
        self.settle(
            Mutation::RejectRequest {
                listing_id: listing_id.to_string(),
            },
            result,
        )
        .await
    }

    pub async fn remove_tenant(&self, listing_id: &str, user_id: &str) -> Result<(), ClientError> {
        let result = self.api.remove_tenant(listing_id, user_id).await;
        self.settle(
            Mutation::RemoveTenant {
                listing_id: listing_id.to_string(),
                user_id: user_id.to_string(),
            },
            result,
        )
        .await
    }

    pub async fn update_contact_phone(
        &self,
        listing_id: &str,
        contact_phone: Option<&str>,
    ) -> Result<(), ClientError> {
        let result = self.api.update_contact_phone(listing_id, contact_phone).await;
        self.settle(Mutation::UpdateContactPhone, result).await
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ClientError> {
        let result = self.api.mark_notification_read(notification_id).await;
        self.settle(
            Mutation::MarkNotificationRead {
                user_id: self.user_id.clone(),
            },
            result,
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        let result = self.api.mark_all_notifications_read().await;
        self.settle(
            Mutation::MarkAllNotificationsRead {
                user_id: self.user_id.clone(),
            },
            result,
        )
        .await
    }

    /// Archive a listing, removing it from the cached list right away.
    ///
    /// - success: the listing scope is invalidated
    /// - rejection: the list is restored from the snapshot
    /// - transport failure or unconfirmed server error: the list is marked
    ///   stale, not restored
    pub async fn archive_listing(&self, listing_id: &str) -> Result<(), ClientError> {
        let key = CacheKey::ListerListings;
        let snapshot = {
            let mut cache = self.cache.lock().await;
            let snapshot = cache.snapshot(&key);
            cache.remove_from_list(&key, listing_id);
            snapshot
        };

        let result = self.api.archive_listing(listing_id).await;

        let mut cache = self.cache.lock().await;
        match &result {
            Ok(()) => {
                cache.invalidate(&Mutation::ArchiveListing {
                    listing_id: listing_id.to_string(),
                });
            }
            Err(e) if e.is_rejection() => {
                debug!(listing_id = %listing_id, "Archive rejected, restoring listings");
                cache.restore(snapshot);
            }
            Err(e) => {
                warn!(error = %e, listing_id = %listing_id, "Archive outcome unknown, re-query listings");
                cache.mark_stale(&key);
            }
        }
        result
    }
}
