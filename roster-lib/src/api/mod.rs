//! Wire types of the HTTP API
//!
//! Shared by the server (which produces them) and the client (which
//! consumes them).

mod auth;
mod listing;

pub use auth::*;
pub use listing::*;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";
/// Path of the listing endpoint.
pub const TABLE_DATA_PATH: &str = "/tasks/table-data";
/// Path of the column metadata endpoint.
pub const COLUMN_INFO_PATH: &str = "/tasks/column-info";
