use chrono::Utc;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::auth::password::check_login;
use crate::auth::{JwtKeys, TokenKind, TokenSubject};
use crate::database::models::{LoginRequest, User};
use crate::database::{Database, UnitOfWork};
use crate::middleware::AuthUser;
use crate::repositories::UserRepository;
use crate::types::DbId;

/// A rotated token pair plus the language the caller's token carried.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub user: User,
    pub lang_code: String,
}

/// Login, refresh, logout, and bearer-token authentication.
///
/// Only the most recently issued access token of a user is accepted: it must
/// match `user.user_token` byte for byte. Logging in again rotates it and
/// logging out clears it.
pub struct AuthService {
    db: Database,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(db: Database, keys: JwtKeys) -> Self {
        Self { db, keys }
    }

    pub async fn login(&self, request: LoginRequest) -> ServiceResult<User> {
        request.validate()?;

        let mut uow = self.db.begin().await?;
        let result = async {
            let credentials =
                UserRepository::find_credentials_by_email(uow.conn(), &request.email).await?;
            let stored_hash = credentials.as_ref().map(|c| c.user_password.as_str());

            if !check_login(&request.password, stored_hash) {
                return Err(ServiceError::InvalidCredentials);
            }
            let Some(credentials) = credentials else {
                return Err(ServiceError::InvalidCredentials);
            };

            self.rotate_tokens(&mut uow, credentials.user_id).await
        }
        .await;

        match uow.finish(result).await {
            Ok(user) => {
                tracing::info!(user_id = user.user_id, "User logged in");
                Ok(user)
            }
            Err(ServiceError::InvalidCredentials) => {
                tracing::info!("Rejected login attempt");
                Err(ServiceError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchange a refresh token for a new pair. The token must verify, be a
    /// refresh token, and still be the one stored for a live user.
    pub async fn refresh(&self, refresh_token: &str) -> ServiceResult<RefreshOutcome> {
        let claims = self
            .keys
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::debug!("Refresh token rejected: {}", e);
                ServiceError::Unauthorized
            })?;

        let mut uow = self.db.begin().await?;
        let result = async {
            let user_id = UserRepository::find_id_by_refresh_token(uow.conn(), refresh_token)
                .await?
                .filter(|id| *id == claims.user_id)
                .ok_or(ServiceError::Unauthorized)?;

            self.rotate_tokens(&mut uow, user_id).await
        }
        .await;
        let user = uow.finish(result).await?;

        Ok(RefreshOutcome {
            user,
            lang_code: claims.user_lang_code,
        })
    }

    /// Resolve a bearer token to the caller, or `Unauthorized`.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthUser> {
        let claims = self.keys.validate(token, TokenKind::Access).map_err(|e| {
            tracing::debug!("Access token rejected: {}", e);
            ServiceError::Unauthorized
        })?;

        let mut uow = self.db.begin().await?;
        let result = UserRepository::find_session(uow.conn(), claims.user_id)
            .await
            .map_err(ServiceError::from);
        let session = uow.finish(result).await?.ok_or_else(|| {
            tracing::debug!(user_id = claims.user_id, "Token for missing or deleted user");
            ServiceError::Unauthorized
        })?;

        if session.user_token.as_deref() != Some(token) {
            tracing::warn!(user_id = session.user_id, "Stale access token presented");
            return Err(ServiceError::Unauthorized);
        }

        Ok(AuthUser {
            user_id: session.user_id,
            user_name: session.user_name,
            user_email: session.user_email,
            user_lang_code: session.user_lang_code,
        })
    }

    /// Clear both stored tokens. Returns `false` when the user no longer exists.
    pub async fn logout(&self, user_id: DbId) -> ServiceResult<bool> {
        let mut uow = self.db.begin().await?;
        let result = UserRepository::clear_tokens(uow.conn(), user_id)
            .await
            .map_err(ServiceError::from);
        let cleared = uow.finish(result).await? > 0;

        if cleared {
            tracing::info!(user_id, "User logged out");
        }
        Ok(cleared)
    }

    /// Mint a pair for `user_id`, persist it with the login time, and return
    /// the re-read user carrying the new tokens.
    async fn rotate_tokens(&self, uow: &mut UnitOfWork, user_id: DbId) -> ServiceResult<User> {
        let user = UserRepository::find_by_id(uow.conn(), user_id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let pair = self.keys.issue_pair(&TokenSubject {
            user_id: user.user_id,
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            user_lang_code: user.user_lang_code.clone(),
        })?;

        UserRepository::update_tokens(
            uow.conn(),
            user_id,
            &pair.access_token,
            &pair.refresh_token,
            Utc::now(),
        )
        .await?;

        UserRepository::find_by_id(uow.conn(), user_id)
            .await?
            .ok_or_else(|| ServiceError::Database(sqlx::Error::RowNotFound))
    }
}
