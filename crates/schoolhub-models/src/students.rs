//! Student domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{ClassLevel, Gender};

pub const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, gender, role, dob, \
     class_level, grade, guardian_name, guardian_contact, created_at, updated_at";

/// In-school role of a student. Both authenticate with the `student` role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "student_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudentRole {
    Student,
    Prefect,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Guardian {
    #[sqlx(rename = "guardian_name")]
    pub name: String,
    #[sqlx(rename = "guardian_contact")]
    pub contact_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub role: StudentRole,
    pub dob: Option<NaiveDate>,
    pub class_level: ClassLevel,
    pub grade: String,
    #[sqlx(flatten)]
    pub guardian: Guardian,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student row including the password hash, used only by login.
#[derive(Debug, Clone, FromRow)]
pub struct StudentCredentials {
    #[sqlx(flatten)]
    pub student: Student,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GuardianDto {
    #[validate(length(min = 1, max = 200, message = "Guardian name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Guardian contact number is required"))]
    pub contact_number: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub gender: Gender,
    /// Defaults to `student`.
    pub role: Option<StudentRole>,
    pub dob: Option<NaiveDate>,
    pub class_level: ClassLevel,
    #[validate(length(min = 1, max = 50, message = "Grade is required"))]
    pub grade: String,
    #[validate(nested)]
    pub guardian: GuardianDto,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_student_changes"))]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<StudentRole>,
    pub dob: Option<NaiveDate>,
    pub class_level: Option<ClassLevel>,
    #[validate(length(min = 1, max = 50))]
    pub grade: Option<String>,
    #[validate(nested)]
    pub guardian: Option<GuardianDto>,
}

fn validate_student_changes(dto: &UpdateStudentDto) -> Result<(), validator::ValidationError> {
    let empty = dto.first_name.is_none()
        && dto.last_name.is_none()
        && dto.email.is_none()
        && dto.password.is_none()
        && dto.gender.is_none()
        && dto.role.is_none()
        && dto.dob.is_none()
        && dto.class_level.is_none()
        && dto.grade.is_none()
        && dto.guardian.is_none();

    if empty {
        return Err(crate::no_changes_error());
    }
    Ok(())
}
