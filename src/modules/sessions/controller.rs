use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::{SessionId, UserId};

use super::model::{Session, SessionDto};
use super::service::SessionService;
use crate::middleware::auth::{AuthUser, RequireAdmin, ensure_self_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{PathParam, ValidatedJson};

/// List all sessions
///
/// Sessions are ordered by date, earliest first.
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "List of sessions", body = Vec<Session>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_sessions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Session>>, AppError> {
    let sessions = SessionService::get_sessions(&state.db).await?;
    Ok(Json(sessions))
}

/// Get a session by id
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session found", body = Session),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_session(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    PathParam(id): PathParam<SessionId>,
) -> Result<Json<Session>, AppError> {
    let session = SessionService::get_session(&state.db, id).await?;
    Ok(Json(session))
}

/// Create a session (admin only)
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = SessionDto,
    responses(
        (status = 200, description = "Session created", body = Session),
        (status = 400, description = "Validation error, unknown teacher or unknown user", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, admin, dto), fields(admin = %admin.0.email(), name = %dto.name))]
pub async fn create_session(
    State(state): State<AppState>,
    admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<SessionDto>,
) -> Result<Json<Session>, AppError> {
    let session = SessionService::create_session(&state.db, dto).await?;
    Ok(Json(session))
}

/// Update a session (admin only)
///
/// Omitting `users` keeps the current participants.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(("id" = i64, Path, description = "Session id")),
    request_body = SessionDto,
    responses(
        (status = 200, description = "Session updated", body = Session),
        (status = 400, description = "Validation error, unknown teacher or unknown user", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, admin, dto), fields(admin = %admin.0.email()))]
pub async fn update_session(
    State(state): State<AppState>,
    admin: RequireAdmin,
    PathParam(id): PathParam<SessionId>,
    ValidatedJson(dto): ValidatedJson<SessionDto>,
) -> Result<Json<Session>, AppError> {
    let session = SessionService::update_session(&state.db, id, dto).await?;
    Ok(Json(session))
}

/// Delete a session (admin only)
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, admin), fields(admin = %admin.0.email()))]
pub async fn delete_session(
    State(state): State<AppState>,
    admin: RequireAdmin,
    PathParam(id): PathParam<SessionId>,
) -> Result<StatusCode, AppError> {
    SessionService::delete_session(&state.db, id).await?;
    Ok(StatusCode::OK)
}

/// Join a session
///
/// Members may only enrol themselves; admins may enrol anyone.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/participants/{user_id}",
    params(
        ("id" = i64, Path, description = "Session id"),
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Participation recorded"),
        (status = 400, description = "Already participating or invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your participation", body = ErrorResponse),
        (status = 404, description = "Session or user not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, auth_user), fields(caller = %auth_user.email()))]
pub async fn participate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    PathParam((id, user_id)): PathParam<(SessionId, UserId)>,
) -> Result<StatusCode, AppError> {
    ensure_self_or_admin(&auth_user, user_id)?;
    SessionService::participate(&state.db, id, user_id).await?;
    Ok(StatusCode::OK)
}

/// Leave a session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/participants/{user_id}",
    params(
        ("id" = i64, Path, description = "Session id"),
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Participation removed"),
        (status = 400, description = "Not participating or invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your participation", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Sessions"
)]
#[instrument(skip(state, auth_user), fields(caller = %auth_user.email()))]
pub async fn no_longer_participate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    PathParam((id, user_id)): PathParam<(SessionId, UserId)>,
) -> Result<StatusCode, AppError> {
    ensure_self_or_admin(&auth_user, user_id)?;
    SessionService::no_longer_participate(&state.db, id, user_id).await?;
    Ok(StatusCode::OK)
}
