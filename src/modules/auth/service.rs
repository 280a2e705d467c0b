use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use zenbook_auth::create_access_token;
use zenbook_config::JwtConfig;
use zenbook_core::{AppError, hash_password, verify_password};
use zenbook_models::Email;
use zenbook_models::users::User;

use super::model::{JwtResponse, LoginRequest, SignupRequest};
use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

const EMAIL_TAKEN: &str = "Error: Email is already taken!";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Creates a non-admin member account. The email is stored lowercased.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: SignupRequest) -> Result<User, AppError> {
        let email = Email::normalize(&dto.email);

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = $1)")
                .bind(&email)
                .fetch_one(db)
                .await
                .context("Failed to check email availability")
                .map_err(AppError::internal)?;

        if taken {
            return Err(AppError::bad_request(anyhow!(EMAIL_TAKEN)));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, password, admin)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id, email, first_name, last_name, admin, created_at, updated_at
            "#,
        )
        .bind(&email)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request(anyhow!(EMAIL_TAKEN))
            }
            other => AppError::internal(anyhow::Error::new(other).context("Failed to insert user")),
        })?;

        track_user_registered();
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<JwtResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            #[sqlx(flatten)]
            user: User,
            password: String,
        }

        let Some(record) = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, email, first_name, last_name, admin, created_at, updated_at, password
            FROM users
            WHERE LOWER(email) = $1
            "#,
        )
        .bind(Email::normalize(&dto.email))
        .fetch_optional(db)
        .await
        .context("Failed to fetch user for login")
        .map_err(AppError::internal)?
        else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &record.password)? {
            track_user_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = record.user;
        let token = create_access_token(
            user.id.into_inner(),
            user.email.as_str(),
            user.admin,
            jwt_config,
        )?;

        track_jwt_issued();
        track_user_login_success(if user.admin { "admin" } else { "member" });

        Ok(JwtResponse::bearer(token, &user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use zenbook_auth::verify_token;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "service-test-secret-key-0123456789".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            first_name: "Sophie".to_string(),
            last_name: "Martin".to_string(),
            password: "namaste123".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_creates_member(pool: PgPool) {
        let user = AuthService::register_user(&pool, signup("sophie@studio.com"))
            .await
            .unwrap();

        assert_eq!(user.email, "sophie@studio.com");
        assert_eq!(user.first_name, "Sophie");
        assert!(!user.admin);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_email(pool: PgPool) {
        AuthService::register_user(&pool, signup("dup@studio.com"))
            .await
            .unwrap();

        let err = AuthService::register_user(&pool, signup("dup@studio.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), EMAIL_TAKEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_email_ignores_case(pool: PgPool) {
        let user = AuthService::register_user(&pool, signup("Sophie@Studio.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "sophie@studio.com");

        let err = AuthService::register_user(&pool, signup("sophie@studio.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), EMAIL_TAKEN);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_ignores_email_case(pool: PgPool) {
        let user = AuthService::register_user(&pool, signup("mixed@studio.com"))
            .await
            .unwrap();

        let response = AuthService::login_user(
            &pool,
            LoginRequest {
                email: "MIXED@Studio.com".to_string(),
                password: "namaste123".to_string(),
            },
            &jwt_config(),
        )
        .await
        .unwrap();

        assert_eq!(response.id, user.id);
        assert_eq!(response.username, "mixed@studio.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_returns_valid_token(pool: PgPool) {
        let user = AuthService::register_user(&pool, signup("login@studio.com"))
            .await
            .unwrap();
        let config = jwt_config();

        let response = AuthService::login_user(
            &pool,
            LoginRequest {
                email: "login@studio.com".to_string(),
                password: "namaste123".to_string(),
            },
            &config,
        )
        .await
        .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.id, user.id);
        assert_eq!(response.username, "login@studio.com");
        assert!(!response.admin);

        let claims = verify_token(&response.token, &config).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "login@studio.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_rejects_bad_credentials(pool: PgPool) {
        AuthService::register_user(&pool, signup("bad@studio.com"))
            .await
            .unwrap();

        let wrong_password = AuthService::login_user(
            &pool,
            LoginRequest {
                email: "bad@studio.com".to_string(),
                password: "wrong-one".to_string(),
            },
            &jwt_config(),
        )
        .await
        .unwrap_err();
        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

        let unknown = AuthService::login_user(
            &pool,
            LoginRequest {
                email: "ghost@studio.com".to_string(),
                password: "namaste123".to_string(),
            },
            &jwt_config(),
        )
        .await
        .unwrap_err();
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.error.to_string(), INVALID_CREDENTIALS);
    }
}
