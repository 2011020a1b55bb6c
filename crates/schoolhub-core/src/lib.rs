//! # SchoolHub Core
//!
//! Core types, errors, and utilities for the SchoolHub API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The `{ success, message, data, total, error }` envelope
//! - [`pagination`]: Query parameters for paginated listings
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::{ApiResponse, AppError};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let body = ApiResponse::ok("Course retrieved successfully.", course);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;

pub use errors::AppError;
pub use pagination::PaginationParams;
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, MessageResponse};
