use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use schoolhub_auth::{Claims, Role, verify_token};
use schoolhub_core::AppError;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// Extractor that validates the bearer token and checks that its login
/// session is still open.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Teacher or student ID from the token subject.
    pub fn identity_id(&self) -> Result<Uuid, AppError> {
        self.0
            .identity_id()
            .ok_or_else(|| AppError::unauthorized("Invalid identity in token"))
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn session_id(&self) -> Uuid {
        self.0.sid
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }
}

/// Decodes and verifies the bearer token without touching the database.
pub(crate) async fn bearer_claims(parts: &mut Parts, state: &AppState) -> Result<Claims, AppError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::unauthorized("Missing or malformed authorization header"))?;

    verify_token(bearer.token(), &state.jwt_config)
}

/// Rejects tokens whose session has ended by logout or expiry.
pub(crate) async fn ensure_session_open(state: &AppState, claims: &Claims) -> Result<(), AppError> {
    if !AuthService::is_session_open(&state.db, &state.jwt_config, claims.sid).await? {
        return Err(AppError::unauthorized("Session has ended. Please log in again"));
    }
    Ok(())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state).await?;
        ensure_session_open(state, &claims).await?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, sub: String) -> Claims {
        Claims {
            sub,
            email: "teacher@school.test".to_string(),
            role,
            sid: Uuid::new_v4(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_identity_id() {
        let id = Uuid::new_v4();
        let auth_user = AuthUser(claims(Role::Teacher, id.to_string()));
        assert_eq!(auth_user.identity_id().unwrap(), id);
        assert_eq!(auth_user.email(), "teacher@school.test");
    }

    #[test]
    fn test_invalid_subject_is_unauthorized() {
        let auth_user = AuthUser(claims(Role::Student, "nope".to_string()));
        let err = auth_user.identity_id().unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_is_admin() {
        assert!(AuthUser(claims(Role::Admin, Uuid::new_v4().to_string())).is_admin());
        assert!(!AuthUser(claims(Role::Teacher, Uuid::new_v4().to_string())).is_admin());
    }
}
