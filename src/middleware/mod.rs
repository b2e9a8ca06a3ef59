pub mod auth;
pub mod localize;
pub mod response;

pub use auth::{extract_bearer, require_auth, AuthUser, CallerLang};
pub use localize::localize;
pub use response::{ApiResponse, ApiResult, Envelope};
