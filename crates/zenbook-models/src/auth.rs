//! Login and registration payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::users::User;

#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "yoga@studio.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(
        email(message = "email must be a valid email address"),
        length(max = 50, message = "email must be at most 50 characters")
    )]
    pub email: String,
    #[validate(length(
        min = 3,
        max = 20,
        message = "firstName must be between 3 and 20 characters"
    ))]
    pub first_name: String,
    #[validate(length(
        min = 3,
        max = 20,
        message = "lastName must be between 3 and 20 characters"
    ))]
    pub last_name: String,
    #[validate(length(
        min = 6,
        max = 40,
        message = "password must be between 6 and 40 characters"
    ))]
    pub password: String,
}

/// Successful login payload consumed by the web client.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: UserId,
    /// The account email.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
}

impl JwtResponse {
    pub fn bearer(token: String, user: &User) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            id: user.id,
            username: user.email.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            admin: user.admin,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
