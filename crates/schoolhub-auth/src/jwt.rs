//! Access token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use schoolhub_config::JwtConfig;
use schoolhub_core::AppError;

use crate::claims::Claims;
use crate::role::Role;

/// Creates an access token bound to a login session.
pub fn create_access_token(
    identity_id: Uuid,
    email: &str,
    role: Role,
    session_id: Uuid,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.access_token_expiry;

    let claims = Claims {
        sub: identity_id.to_string(),
        email: email.to_string(),
        role,
        sid: session_id,
        exp: exp.max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry; any failure is a 401.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_round_trip_preserves_role_and_session() {
        let identity = Uuid::new_v4();
        let session = Uuid::new_v4();
        let token =
            create_access_token(identity, "admin@school.test", Role::Admin, session, &config())
                .unwrap();

        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, identity.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sid, session);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_access_token(
            Uuid::new_v4(),
            "s@school.test",
            Role::Student,
            Uuid::new_v4(),
            &config(),
        )
        .unwrap();

        let other = JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expiry: 3600,
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: -7200,
        };
        let token = create_access_token(
            Uuid::new_v4(),
            "t@school.test",
            Role::Teacher,
            Uuid::new_v4(),
            &expired,
        )
        .unwrap();

        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", &config()).is_err());
    }
}
