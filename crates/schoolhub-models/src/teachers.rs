//! Teacher domain models and DTOs.
//!
//! Teachers double as administrators: a teacher with the `admin` role is
//! the only identity allowed to mutate the registry, the ledger and the
//! journal.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhub_auth::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::Gender;

/// Column list for teacher reads. The password hash is never selected.
pub const TEACHER_COLUMNS: &str =
    "id, first_name, last_name, email, role, gender, dob, subjects, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "teacher_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeacherRole {
    Admin,
    Teacher,
}

impl From<TeacherRole> for Role {
    fn from(role: TeacherRole) -> Self {
        match role {
            TeacherRole::Admin => Role::Admin,
            TeacherRole::Teacher => Role::Teacher,
        }
    }
}

/// A teacher as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: TeacherRole,
    pub gender: Gender,
    pub dob: Option<NaiveDate>,
    pub subjects: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher row including the password hash, used only by login.
#[derive(Debug, Clone, FromRow)]
pub struct TeacherCredentials {
    #[sqlx(flatten)]
    pub teacher: Teacher,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub gender: Gender,
    /// Defaults to `teacher`.
    pub role: Option<TeacherRole>,
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_teacher_changes"))]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<TeacherRole>,
    pub dob: Option<NaiveDate>,
    pub subjects: Option<Vec<String>>,
}

fn validate_teacher_changes(dto: &UpdateTeacherDto) -> Result<(), validator::ValidationError> {
    let empty = dto.first_name.is_none()
        && dto.last_name.is_none()
        && dto.email.is_none()
        && dto.password.is_none()
        && dto.gender.is_none()
        && dto.role.is_none()
        && dto.dob.is_none()
        && dto.subjects.is_none();

    if empty {
        return Err(crate::no_changes_error());
    }
    Ok(())
}
