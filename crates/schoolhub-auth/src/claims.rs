use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::role::Role;

/// JWT claims for access tokens.
///
/// - `sub`: Teacher or student ID (subject)
/// - `email`: Login email
/// - `role`: Role used by capability checks
/// - `sid`: Login session the token belongs to; logging out ends it
/// - `exp` / `iat`: Expiry and issued-at timestamps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub sid: Uuid,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn identity_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "8a0c7c4e-6a5e-4c6a-9a53-0d1f0f2b5d11".to_string(),
            email: "teacher@school.test".to_string(),
            role: Role::Teacher,
            sid: Uuid::nil(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""role":"teacher""#));
        assert!(serialized.contains(r#""email":"teacher@school.test""#));
    }

    #[test]
    fn test_identity_id() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            email: "a@b.test".to_string(),
            role: Role::Admin,
            sid: Uuid::new_v4(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.identity_id(), Some(id));

        let bad = Claims {
            sub: "not-a-uuid".to_string(),
            ..claims
        };
        assert_eq!(bad.identity_id(), None);
    }
}
