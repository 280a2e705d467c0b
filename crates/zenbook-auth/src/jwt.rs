//! Access token creation and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use zenbook_config::JwtConfig;
use zenbook_core::AppError;

use crate::claims::Claims;

/// Creates a signed access token for a user.
///
/// # Errors
///
/// Returns an internal error if the configured lifetime is not positive,
/// the expiry overflows, or encoding fails.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    admin: bool,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    if jwt_config.access_token_expiry <= 0 {
        return Err(AppError::internal_error(
            "Access token lifetime must be positive",
        ));
    }

    let now = Utc::now().timestamp();
    let exp = now
        .checked_add(jwt_config.access_token_expiry)
        .and_then(|exp| usize::try_from(exp).ok())
        .ok_or_else(|| AppError::internal_error("Access token expiry overflows"))?;
    let now = usize::try_from(now)
        .map_err(|_| AppError::internal_error("System clock is before the Unix epoch"))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        admin,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// Every failure, whether a bad signature, an expired token or garbage
/// input, is reported as 401 with the same message.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = get_test_jwt_config();

        let token = create_access_token(42, "yoga@studio.com", true, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "yoga@studio.com");
        assert!(claims.admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let err = verify_token("invalid-token", &config).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "test@example.com", false, &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        };

        assert!(verify_token(&token, &wrong_config).is_err());
    }

    #[test]
    fn test_create_token_rejects_non_positive_lifetime() {
        for expiry in [0, -3600, i64::MIN] {
            let config = JwtConfig {
                access_token_expiry: expiry,
                ..get_test_jwt_config()
            };

            let err = create_access_token(1, "test@example.com", false, &config).unwrap_err();
            assert_eq!(err.status.as_u16(), 500);
        }
    }

    #[test]
    fn test_create_token_rejects_overflowing_lifetime() {
        let config = JwtConfig {
            access_token_expiry: i64::MAX,
            ..get_test_jwt_config()
        };

        assert!(create_access_token(1, "test@example.com", false, &config).is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            email: "old@example.com".to_string(),
            admin: false,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }
}
