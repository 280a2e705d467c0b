//! # Zenbook Auth
//!
//! Bearer token support for the Zenbook API.
//!
//! - [`claims`]: the JWT claim set
//! - [`jwt`]: token creation and verification
//!
//! ```ignore
//! use zenbook_auth::{create_access_token, verify_token};
//! use zenbook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "yoga@studio.com", true, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.admin);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
