//! Client for the roomshare API.
//!
//! - [`ApiClient`]: typed calls to every endpoint
//! - [`SyncClient`]: the same calls behind a query cache that is kept in
//!   step with mutations

pub mod api;
pub mod cache;
pub mod error;
pub mod sync;
pub mod types;

pub use api::ApiClient;
pub use cache::{CacheKey, Mutation, QueryCache};
pub use error::ClientError;
pub use sync::SyncClient;
pub use types::*;
