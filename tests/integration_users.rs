mod common;

use axum::http::StatusCode;
use common::{
    create_test_session, create_test_user, generate_unique_email, get_auth_token, send,
    setup_test_app,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "namaste123", false).await;
    let app = setup_test_app(pool).await;
    let token = get_auth_token(&app, &email, "namaste123").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}", user.id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.into_inner());
    assert_eq!(body["email"], email);
    assert_eq!(body["firstName"], "Test");
    assert_eq!(body["admin"], false);
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_not_found(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "namaste123", false).await;
    let app = setup_test_app(pool).await;
    let token = get_auth_token(&app, &email, "namaste123").await;

    let (status, body) = send(&app, "GET", "/api/users/999999", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_requires_token(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "namaste123", false).await;
    let app = setup_test_app(pool).await;

    let (status, _) = send(&app, "GET", &format!("/api/users/{}", user.id), None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_own_account(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "namaste123", false).await;
    let session_id = create_test_session(&pool, "Farewell Flow").await;
    sqlx::query("INSERT INTO session_participants (session_id, user_id) VALUES ($1, $2)")
        .bind(session_id)
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(&app, &email, "namaste123").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", user.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM session_participants WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);

    let (status, _) = send(&app, "GET", "/api/sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_delete_someone_else(pool: PgPool) {
    let admin_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "adminpass", true).await;
    let victim = create_test_user(&pool, &generate_unique_email(), "victimpass", false).await;
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(&app, &admin_email, "adminpass").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", victim.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/api/users/999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let still_there: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(victim.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(still_there);
}
