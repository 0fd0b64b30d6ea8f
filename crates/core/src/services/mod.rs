//! Business logic services.

#![allow(missing_docs)]

pub mod guard;
pub mod listing;
pub mod notification;
pub mod roster;
pub mod tenant_request;
pub mod user;

pub use guard::ListingGuard;
pub use listing::{ListingService, ListingWithTenantCount};
pub use notification::{NotificationMetadata, NotificationService};
pub use roster::{RosterService, TenantAddition};
pub use tenant_request::{RequestStatusView, TenantRequestService};
pub use user::UserService;
