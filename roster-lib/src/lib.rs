//! Roster client library
//!
//! Shared model, filter evaluation and an async HTTP client for the Roster
//! employee directory service.

pub mod api;
pub mod auth;
pub mod cache;
pub mod error;
pub mod filter;
pub mod model;
pub mod response;

mod client;

pub use client::*;
pub use response::Origin;
pub use response::Response;
