//! Studio members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;
use crate::value_types::Email;

/// A registered member of the studio.
///
/// The password hash lives in the same table but is never selected into
/// this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_camel_case_without_password() {
        let user = User {
            id: UserId::new(1),
            email: Email::new_unchecked("yoga@studio.com"),
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "yoga@studio.com");
        assert_eq!(json["firstName"], "Admin");
        assert_eq!(json["admin"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());
    }
}
