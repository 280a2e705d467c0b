//! # Zenbook Models
//!
//! Database entities, request/response DTOs and typed identifiers.
//!
//! - [`auth`]: login, registration and token responses
//! - [`ids`]: `UserId`, `SessionId`, `TeacherId`
//! - [`sessions`]: yoga sessions and their participant lists
//! - [`teachers`]: teachers leading sessions
//! - [`users`]: studio members
//! - [`value_types`]: validated primitives such as [`Email`]

pub mod auth;
pub mod ids;
pub mod sessions;
pub mod teachers;
pub mod users;
pub mod validation;
pub mod value_types;

pub use ids::{SessionId, TeacherId, UserId};
pub use value_types::Email;
