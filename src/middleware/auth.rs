use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use zenbook_auth::verify_token;
use zenbook_core::AppError;
use zenbook_models::UserId;

use crate::state::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Extractor that validates the bearer token and loads the caller's account.
///
/// The token only identifies the user. `admin` and the account's existence
/// come from the `users` row, so deleted or demoted users lose access at once.
#[derive(Debug, Clone)]
pub struct AuthUser {
    id: UserId,
    email: String,
    admin: bool,
}

impl AuthUser {
    pub fn new(id: UserId, email: impl Into<String>, admin: bool) -> Self {
        Self {
            id,
            email: email.into(),
            admin,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            <TypedHeader<Authorization<Bearer>> as FromRequestParts<AppState>>::from_request_parts(
                parts, state,
            )
            .await
            .map_err(|_| AppError::unauthorized("Missing or malformed authorization header"))?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;
        let id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(INVALID_TOKEN))?;

        let account: Option<(String, bool)> =
            sqlx::query_as("SELECT email, admin FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.db)
                .await
                .map_err(|e| {
                    AppError::internal(
                        anyhow::Error::new(e).context("Failed to load authenticated user"),
                    )
                })?;

        let Some((email, admin)) = account else {
            tracing::warn!(user_id = %id, "Token presented for a deleted account");
            return Err(AppError::unauthorized(INVALID_TOKEN));
        };

        Ok(AuthUser::new(id, email, admin))
    }
}

/// Extractor for admin-only handlers. Non-admins get 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !auth_user.is_admin() {
            return Err(AppError::forbidden(
                "Access denied. Administrator privileges required.",
            ));
        }

        Ok(RequireAdmin(auth_user))
    }
}

/// Passes when the caller is `user_id` or an admin.
pub fn ensure_self_or_admin(auth_user: &AuthUser, user_id: UserId) -> Result<(), AppError> {
    if auth_user.is_admin() || auth_user.user_id() == user_id {
        return Ok(());
    }

    Err(AppError::forbidden(
        "Access denied. You can only manage your own participation.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn auth_user(id: i64, admin: bool) -> AuthUser {
        AuthUser::new(UserId::new(id), "member@studio.com", admin)
    }

    #[test]
    fn test_accessors() {
        let user = auth_user(17, true);
        assert_eq!(user.user_id(), UserId::new(17));
        assert_eq!(user.email(), "member@studio.com");
        assert!(user.is_admin());
        assert!(!auth_user(17, false).is_admin());
    }

    #[test]
    fn test_ensure_self_or_admin() {
        assert!(ensure_self_or_admin(&auth_user(5, false), UserId::new(5)).is_ok());
        assert!(ensure_self_or_admin(&auth_user(1, true), UserId::new(5)).is_ok());

        let err = ensure_self_or_admin(&auth_user(6, false), UserId::new(5)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
