pub mod lang;
pub mod translation;
pub mod user;

pub use lang::{Lang, LangRequest};
pub use translation::{
    Translation, TranslationKey, TranslationRequest, TranslationText, TranslationTextRequest,
    TranslationTextRow,
};
pub use user::{
    DeleteUserRequest, LoginRequest, NewUser, User, UserChanges, UserCredentials, UserRequest,
    UserSession,
};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{DbId, Timestamp};

/// Creator/updater stamps shared by every table, with display names resolved
/// through `LEFT JOIN "user"`. Either side of the join may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Audit {
    pub created_by: Option<DbId>,
    pub created_by_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_by_name: Option<String>,
    pub updated_at: Option<Timestamp>,
}
