//! Authentication

mod session;
mod store;
mod token;

pub use session::RevokeReason;
pub use session::SessionContext;
pub use session::SessionState;
pub use store::CookieOptions;
pub use store::MemoryTokenStore;
pub use store::SameSite;
pub use store::TOKEN_COOKIE;
pub use store::TokenStore;
pub use token::AccessToken;
