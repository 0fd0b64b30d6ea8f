//! Client-side query cache.
//!
//! Entries are keyed by the collection they hold. After a mutation every
//! entry the mutation could have changed is dropped so the next read goes
//! back to the server. The cache never decides anything on its own; it only
//! mirrors what the server returned.

#![allow(missing_docs)]

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// A cached collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Notification feed of one user.
    Notifications { user_id: String },
    /// Unread notification count of one user.
    UnreadCount { user_id: String },
    /// The signed-in lister's listings.
    ListerListings,
    /// Confirmed tenants of a listing.
    Tenants { listing_id: String },
    /// Pending requests on a listing.
    PendingRequests { listing_id: String },
    /// One user's request status on a listing.
    RequestStatus { listing_id: String, user_id: String },
}

impl CacheKey {
    fn listing_id(&self) -> Option<&str> {
        match self {
            Self::Tenants { listing_id }
            | Self::PendingRequests { listing_id }
            | Self::RequestStatus { listing_id, .. } => Some(listing_id),
            _ => None,
        }
    }
}

/// A completed server-side mutation and the scope it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SubmitRequest { listing_id: String, requester_id: String },
    AcceptRequest { listing_id: String },
    RejectRequest { listing_id: String },
    RemoveTenant { listing_id: String, user_id: String },
    UpdateContactPhone,
    ArchiveListing { listing_id: String },
    MarkNotificationRead { user_id: String },
    MarkAllNotificationsRead { user_id: String },
}

impl Mutation {
    /// Whether this mutation may have changed the collection under `key`.
    #[must_use]
    pub fn invalidates(&self, key: &CacheKey) -> bool {
        match self {
            Self::SubmitRequest {
                listing_id,
                requester_id,
            } => match key {
                CacheKey::PendingRequests { listing_id: l } => l == listing_id,
                CacheKey::RequestStatus {
                    listing_id: l,
                    user_id,
                } => l == listing_id && user_id == requester_id,
                _ => false,
            },
            // Accepting changes the roster, the pending list, the requester's
            // status and the lister's tenant counts.
            Self::AcceptRequest { listing_id } => {
                matches!(key, CacheKey::ListerListings)
                    || key.listing_id() == Some(listing_id.as_str())
            }
            Self::RejectRequest { listing_id } => matches!(
                key,
                CacheKey::PendingRequests { listing_id: l }
                    | CacheKey::RequestStatus { listing_id: l, .. } if l == listing_id
            ),
            Self::RemoveTenant {
                listing_id,
                user_id,
            } => match key {
                CacheKey::ListerListings => true,
                CacheKey::Tenants { listing_id: l } => l == listing_id,
                CacheKey::RequestStatus {
                    listing_id: l,
                    user_id: u,
                } => l == listing_id && u == user_id,
                _ => false,
            },
            Self::UpdateContactPhone => matches!(key, CacheKey::ListerListings),
            Self::ArchiveListing { listing_id } => {
                matches!(key, CacheKey::ListerListings)
                    || key.listing_id() == Some(listing_id.as_str())
            }
            Self::MarkNotificationRead { user_id } | Self::MarkAllNotificationsRead { user_id } => {
                matches!(
                    key,
                    CacheKey::Notifications { user_id: u } | CacheKey::UnreadCount { user_id: u }
                        if u == user_id
                )
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    stale: bool,
}

/// Snapshot taken before an optimistic update.
#[derive(Debug, Clone)]
pub struct Snapshot {
    key: CacheKey,
    value: Option<Value>,
}

/// In-memory query cache.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Entry>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value, if any. Stale or undecodable entries read as a miss.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key).filter(|e| !e.stale)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Store a server response.
    pub fn put<T: Serialize>(&mut self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(key, Entry { value, stale: false });
            }
            Err(e) => {
                tracing::warn!(error = %e, key = ?key, "Failed to cache response");
                self.entries.remove(&key);
            }
        }
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.stale)
    }

    /// Drop every entry the mutation could have changed.
    pub fn invalidate(&mut self, mutation: &Mutation) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !mutation.invalidates(key));
        let dropped = before - self.entries.len();
        debug!(mutation = ?mutation, dropped, "Invalidated cached queries");
        dropped
    }

    /// Keep the entry but force the next read to re-query.
    pub fn mark_stale(&mut self, key: &CacheKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Take a snapshot of `key` for a later [`QueryCache::restore`].
    #[must_use]
    pub fn snapshot(&self, key: &CacheKey) -> Snapshot {
        Snapshot {
            key: key.clone(),
            value: self.entries.get(key).map(|e| e.value.clone()),
        }
    }

    /// Put a snapshot back exactly as it was taken.
    pub fn restore(&mut self, snapshot: Snapshot) {
        match snapshot.value {
            Some(value) => {
                self.entries
                    .insert(snapshot.key, Entry { value, stale: false });
            }
            None => {
                self.entries.remove(&snapshot.key);
            }
        }
    }

    /// Remove one item (matched on its `id` field) from a cached list.
    ///
    /// Returns whether anything was removed.
    pub fn remove_from_list(&mut self, key: &CacheKey, id: &str) -> bool {
        let Some(Value::Array(items)) = self.entries.get_mut(key).map(|e| &mut e.value) else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.get("id").and_then(Value::as_str) != Some(id));
        items.len() != before
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending(listing_id: &str) -> CacheKey {
        CacheKey::PendingRequests {
            listing_id: listing_id.to_string(),
        }
    }

    fn status(listing_id: &str, user_id: &str) -> CacheKey {
        CacheKey::RequestStatus {
            listing_id: listing_id.to_string(),
            user_id: user_id.to_string(),
        }
    }

    fn tenants(listing_id: &str) -> CacheKey {
        CacheKey::Tenants {
            listing_id: listing_id.to_string(),
        }
    }

    fn notifications(user_id: &str) -> CacheKey {
        CacheKey::Notifications {
            user_id: user_id.to_string(),
        }
    }

    fn seeded() -> QueryCache {
        let mut cache = QueryCache::new();
        for key in [
            pending("l1"),
            pending("l2"),
            status("l1", "s1"),
            status("l1", "s2"),
            tenants("l1"),
            tenants("l2"),
            notifications("s1"),
            CacheKey::UnreadCount {
                user_id: "s1".to_string(),
            },
            CacheKey::ListerListings,
        ] {
            cache.put(key, &json!([]));
        }
        cache
    }

    #[test]
    fn test_submit_touches_only_requester_scope() {
        let mut cache = seeded();
        let dropped = cache.invalidate(&Mutation::SubmitRequest {
            listing_id: "l1".to_string(),
            requester_id: "s1".to_string(),
        });

        assert_eq!(dropped, 2);
        assert!(!cache.contains(&pending("l1")));
        assert!(!cache.contains(&status("l1", "s1")));
        assert!(cache.contains(&status("l1", "s2")));
        assert!(cache.contains(&pending("l2")));
    }

    #[test]
    fn test_accept_invalidates_listing_scope_and_counts() {
        let mut cache = seeded();
        cache.invalidate(&Mutation::AcceptRequest {
            listing_id: "l1".to_string(),
        });

        assert!(!cache.contains(&pending("l1")));
        assert!(!cache.contains(&tenants("l1")));
        assert!(!cache.contains(&status("l1", "s2")));
        assert!(!cache.contains(&CacheKey::ListerListings));
        assert!(cache.contains(&tenants("l2")));
        assert!(cache.contains(&notifications("s1")));
    }

    #[test]
    fn test_reject_leaves_roster_alone() {
        let mut cache = seeded();
        cache.invalidate(&Mutation::RejectRequest {
            listing_id: "l1".to_string(),
        });

        assert!(!cache.contains(&pending("l1")));
        assert!(!cache.contains(&status("l1", "s1")));
        assert!(cache.contains(&tenants("l1")));
        assert!(cache.contains(&CacheKey::ListerListings));
    }

    #[test]
    fn test_mark_all_read_scoped_to_user() {
        let mut cache = seeded();
        cache.put(notifications("s2"), &json!([]));

        let dropped = cache.invalidate(&Mutation::MarkAllNotificationsRead {
            user_id: "s1".to_string(),
        });

        assert_eq!(dropped, 2);
        assert!(cache.contains(&notifications("s2")));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cache = QueryCache::new();
        cache.put(
            CacheKey::ListerListings,
            &json!([{ "id": "a" }, { "id": "b" }]),
        );

        let snapshot = cache.snapshot(&CacheKey::ListerListings);
        assert!(cache.remove_from_list(&CacheKey::ListerListings, "a"));
        let current: Value = cache.get(&CacheKey::ListerListings).unwrap();
        assert_eq!(current, json!([{ "id": "b" }]));

        cache.restore(snapshot);
        let restored: Value = cache.get(&CacheKey::ListerListings).unwrap();
        assert_eq!(restored, json!([{ "id": "a" }, { "id": "b" }]));
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cache = QueryCache::new();
        cache.put(CacheKey::ListerListings, &json!([{ "id": "a" }]));

        assert!(!cache.remove_from_list(&CacheKey::ListerListings, "zzz"));
        assert!(!cache.remove_from_list(&tenants("l1"), "a"));
    }

    #[test]
    fn test_stale_entry_reads_as_miss() {
        let mut cache = QueryCache::new();
        cache.put(CacheKey::ListerListings, &json!([]));
        cache.mark_stale(&CacheKey::ListerListings);

        assert!(cache.is_stale(&CacheKey::ListerListings));
        assert!(cache.get::<Value>(&CacheKey::ListerListings).is_none());

        cache.put(CacheKey::ListerListings, &json!([]));
        assert!(!cache.is_stale(&CacheKey::ListerListings));
    }
}
