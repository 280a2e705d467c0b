use std::env;

const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86400; // 24 hours

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds. Always positive when read from the environment.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: parse_expiry(env::var("JWT_ACCESS_EXPIRY").ok().as_deref()),
        }
    }
}

/// Falls back to the default for missing, malformed or non-positive values.
fn parse_expiry(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|seconds| *seconds > 0)
        .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY)
}
