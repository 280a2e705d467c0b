//! # Zenbook Core
//!
//! Core types, errors, and utilities shared by every Zenbook crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use zenbook_core::errors::AppError;
//! use zenbook_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Session not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
