//! Database entities.

#![allow(missing_docs)]

pub mod listing;
pub mod listing_tenant;
pub mod notification;
pub mod student_profile;
pub mod tenant_request;
pub mod user;

pub use listing::Entity as Listing;
pub use listing_tenant::Entity as ListingTenant;
pub use notification::Entity as Notification;
pub use student_profile::Entity as StudentProfile;
pub use tenant_request::Entity as TenantRequest;
pub use user::Entity as User;
