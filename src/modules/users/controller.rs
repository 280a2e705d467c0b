use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::UserId;

use super::model::User;
use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::PathParam;

/// Get a member by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Delete your own account
///
/// Participations are removed together with the account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Missing token or not the account owner", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user), fields(caller = %auth_user.email()))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    PathParam(id): PathParam<UserId>,
) -> Result<StatusCode, AppError> {
    let user = UserService::get_user(&state.db, id).await?;

    if auth_user.user_id() != user.id {
        return Err(AppError::unauthorized(
            "You can only delete your own account",
        ));
    }

    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::OK)
}
