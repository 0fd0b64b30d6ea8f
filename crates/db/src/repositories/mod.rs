//! Repository layer.
//!
//! Each repository wraps a shared `Arc<DatabaseConnection>` handed in at
//! construction; nothing here reaches for a global client.

pub mod listing;
pub mod listing_tenant;
pub mod notification;
pub mod student_profile;
pub mod tenant_request;
pub mod user;

pub use listing::ListingRepository;
pub use listing_tenant::{ListingTenantRepository, TenantWithProfile};
pub use notification::NotificationRepository;
pub use student_profile::StudentProfileRepository;
pub use tenant_request::{RequestWithListing, RequestWithProfile, TenantRequestRepository};
pub use user::UserRepository;
