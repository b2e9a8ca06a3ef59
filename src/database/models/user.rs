use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Audit;
use crate::types::{DbId, Timestamp};

/// Joined read model for a live user. The password hash is never selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_token: Option<String>,
    pub user_token_refresh: Option<String>,
    pub user_lang_code: String,
    pub user_last_login: Option<Timestamp>,
    pub user_photo: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub user_id: DbId,
    pub user_password: String,
}

/// What the auth middleware needs to accept or reject a bearer token.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_lang_code: String,
    pub user_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub user_email: String,
    pub password_hash: String,
    pub user_lang_code: String,
    pub user_photo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub user_name: String,
    pub user_email: String,
    pub user_lang_code: String,
    /// `None` keeps the stored photo.
    pub user_photo: Option<String>,
}

/// Body of `POST /users` and `PUT /users/:id`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 200))]
    pub user_name: String,

    #[validate(length(min = 1, max = 200), email)]
    pub user_email: String,

    #[validate(length(min = 1, max = 5))]
    pub user_lang_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1), email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct DeleteUserRequest {
    pub is_soft_delete: bool,
}
