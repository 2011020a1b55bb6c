//! Extractors for authentication and authorization.
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The token is verified against `JWT_SECRET` and its expiry
//! 3. Role extractors check the role carried in the claims
//! 4. The login session named by the token must still be open
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireAdmin;
//!
//! // Any signed-in teacher or student
//! async fn list_courses(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // Admins only
//! async fn create_course(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
pub mod role;
