#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;
use zenbook::router::init_router;
use zenbook::state::AppState;
use zenbook_core::hash_password;
use zenbook_models::{SessionId, TeacherId, UserId};

pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

pub async fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    init_router(AppState::with_pool(pool))
}

pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, admin: bool) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id: UserId = sqlx::query_scalar(
        r#"
        INSERT INTO users (first_name, last_name, email, password, admin)
        VALUES ('Test', 'User', $1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(hashed)
    .bind(admin)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        admin,
    }
}

pub async fn first_teacher_id(pool: &PgPool) -> TeacherId {
    sqlx::query_scalar("SELECT MIN(id) FROM teachers")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_session(pool: &PgPool, name: &str) -> SessionId {
    sqlx::query_scalar(
        r#"
        INSERT INTO sessions (name, description, date, teacher_id)
        VALUES ($1, 'Test session', NOW() + INTERVAL '1 day', (SELECT MIN(id) FROM teachers))
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Short enough for the 50 character email column.
pub fn generate_unique_email() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("test-{}@test.com", &token[..12])
}

pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Sends one request and returns the status with the parsed JSON body
/// (`Value::Null` when the body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}
