pub mod auth_service;
pub mod lang_service;
pub mod translation_service;
pub mod user_service;

use std::sync::Arc;

use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::database::{Database, DatabaseError};

pub use auth_service::{AuthService, RefreshOutcome};
pub use lang_service::LangService;
pub use translation_service::TranslationService;
pub use user_service::{DeletedUser, UpdatedUser, UserService};

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Outcome of a failed service operation. Absence of a record is not an
/// error; lookups return `Option`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Translation key already exists: {0}")]
    DuplicateKey(String),

    #[error("Record conflicts with an existing row")]
    Conflict,

    #[error("Wrong email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password hashing failed: {0}")]
    Password(String),

    #[error("File storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map_or(false, |code| code == UNIQUE_VIOLATION);

        if is_unique_violation {
            ServiceError::Conflict
        } else {
            ServiceError::Database(err)
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(e) => e.into(),
            other => ServiceError::Database(sqlx::Error::Configuration(other.into())),
        }
    }
}

impl From<argon2::password_hash::Error> for ServiceError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ServiceError::Password(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every service the HTTP layer talks to, built once at startup.
pub struct Services {
    pub users: UserService,
    pub auth: AuthService,
    pub langs: LangService,
    pub translations: TranslationService,
}

impl Services {
    pub fn new(db: Database, config: Arc<AppConfig>) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            users: UserService::new(db.clone(), config.clone()),
            auth: AuthService::new(db.clone(), keys),
            langs: LangService::new(db.clone()),
            translations: TranslationService::new(db),
        }
    }
}
