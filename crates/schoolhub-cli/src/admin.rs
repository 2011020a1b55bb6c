//! Admin bootstrap.
//!
//! Every mutation endpoint requires an admin, so a fresh database needs one
//! created out of band.

use anyhow::{Context, bail};
use schoolhub_core::hash_password;
use schoolhub_models::{Gender, TeacherRole};
use sqlx::PgPool;
use uuid::Uuid;

pub struct NewAdmin<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub gender: Gender,
}

/// Parses `male` or `female`, ignoring case.
pub fn parse_gender(raw: &str) -> anyhow::Result<Gender> {
    match raw.trim().to_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => bail!("Unknown gender '{other}'. Use: male or female"),
    }
}

/// Inserts a teacher with the admin role and returns its id.
pub async fn create_admin(db: &PgPool, admin: NewAdmin<'_>) -> anyhow::Result<Uuid> {
    if admin.password.len() < 6 {
        bail!("Password must be at least 6 characters");
    }

    let hashed_password = hash_password(admin.password).map_err(|e| e.error)?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO teachers (first_name, last_name, email, password, role, gender)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(admin.first_name)
    .bind(admin.last_name)
    .bind(admin.email)
    .bind(&hashed_password)
    .bind(TeacherRole::Admin)
    .bind(admin.gender)
    .fetch_optional(db)
    .await
    .context("failed to insert admin")?;

    match id {
        Some(id) => Ok(id),
        None => bail!("Teacher with this email already exists"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("Male").unwrap(), Gender::Male);
        assert_eq!(parse_gender(" female ").unwrap(), Gender::Female);
        assert!(parse_gender("other").is_err());
    }
}
