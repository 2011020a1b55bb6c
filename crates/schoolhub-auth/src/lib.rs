//! # SchoolHub Auth
//!
//! Authentication types and JWT utilities.
//!
//! - [`claims`]: Access token claims
//! - [`jwt`]: Token creation and verification
//! - [`role`]: The caller roles used by capability checks
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_auth::{Role, create_access_token, verify_token};
//! use schoolhub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(teacher_id, "t@school.test", Role::Admin, session_id, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Admin);
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use role::Role;
