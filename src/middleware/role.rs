//! Role-gated extractors.
//!
//! The role check runs on the verified claims before the session lookup, so
//! a caller with the wrong role gets a 403 without a database round trip.

use schoolhub_auth::Role;

/// Creates an extractor that admits only the listed roles.
#[macro_export]
macro_rules! require_role {
    ($name:ident, [$($role:expr),+ $(,)?], $message:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = schoolhub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let claims = $crate::middleware::auth::bearer_claims(parts, state).await?;

                if !$crate::middleware::role::role_allowed(claims.role, &[$($role),+]) {
                    return Err(schoolhub_core::AppError::forbidden($message));
                }

                $crate::middleware::auth::ensure_session_open(state, &claims).await?;

                Ok($name($crate::middleware::auth::AuthUser(claims)))
            }
        }
    };
}

pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

require_role!(
    RequireAdmin,
    [Role::Admin],
    "Access denied. Administrator privileges required."
);
