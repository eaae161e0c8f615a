//! Shared types, errors, and configuration for Kassabok.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - JWT claims and token verification
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::Claims;
pub use config::{AppConfig, Environment};
pub use error::{AppError, AppResult};
pub use jwt::{JwtAlgorithm, JwtConfig, JwtError, JwtService};
