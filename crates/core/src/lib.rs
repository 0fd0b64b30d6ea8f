//! Core business logic for roomshare.
//!
//! Services sit between the HTTP layer and the repositories. They hold no
//! shared mutable state; the database is the only arbiter of consistency.

pub mod services;

pub use services::*;
