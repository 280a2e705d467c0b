//! Yoga sessions and their participant lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;
use zenbook_core::serde::deserialize_flexible_datetime;

use crate::ids::{SessionId, TeacherId, UserId};
use crate::validation::not_blank;

/// A scheduled session.
///
/// `users` holds the ids of participating members in ascending order. The
/// foreign keys on `session_participants` guarantee every id refers to an
/// existing user.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "teacher_id")]
    pub teacher_id: TeacherId,
    pub users: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.users.binary_search(&user_id).is_ok()
    }
}

/// Body of `POST /sessions` and `PUT /sessions/{id}`.
///
/// When `users` is omitted on update the existing participants are kept.
#[derive(Deserialize, Serialize, Debug, Clone, Validate, ToSchema)]
pub struct SessionDto {
    #[validate(
        length(min = 1, max = 50, message = "name must be between 1 and 50 characters"),
        custom(function = "not_blank", message = "name must not be blank")
    )]
    pub name: String,
    #[validate(
        length(
            min = 1,
            max = 2500,
            message = "description must be between 1 and 2500 characters"
        ),
        custom(function = "not_blank", message = "description must not be blank")
    )]
    pub description: String,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    pub date: DateTime<Utc>,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub users: Option<Vec<UserId>>,
}
