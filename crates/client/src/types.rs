//! Response payloads as the API serializes them.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub university_name: String,
    pub major: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub city: String,
    pub status: String,
    pub max_occupants: i32,
    pub contact_phone: Option<String>,
    pub tenant_count: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub user_id: String,
    pub added_at: String,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub id: String,
    pub requester_id: String,
    pub status: String,
    pub message: Option<String>,
    pub created_at: String,
    pub profile: Option<Profile>,
}

/// The caller's relationship to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    IsTenant,
    None,
    Pending { request_id: String },
    Accepted { request_id: String },
    Rejected { request_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub created_at: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub body: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

/// Response envelope: `error` is `null` on success.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_wire_format() {
        let status: RequestStatus =
            serde_json::from_str(r#"{"status":"pending","request_id":"r1"}"#).unwrap();
        assert_eq!(
            status,
            RequestStatus::Pending {
                request_id: "r1".to_string()
            }
        );

        let status: RequestStatus = serde_json::from_str(r#"{"status":"is_tenant"}"#).unwrap();
        assert_eq!(status, RequestStatus::IsTenant);
    }

    #[test]
    fn test_envelope_with_null_error() {
        let envelope: Envelope<UnreadCount> =
            serde_json::from_str(r#"{"data":{"count":2},"error":null}"#).unwrap();
        assert!(envelope.error.is_none());
        assert_eq!(envelope.data, Some(UnreadCount { count: 2 }));
    }
}
