//! # Zenbook CLI
//!
//! Database seeding utilities for local development and demos.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use zenbook_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(50).with_sessions(20);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
