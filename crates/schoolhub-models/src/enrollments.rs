//! Enrollment ledger models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{CourseSummary, StudentSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "enrollment_status")]
#[serde(try_from = "String")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl TryFrom<String> for EnrollmentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Active" => Ok(Self::Active),
            "Completed" => Ok(Self::Completed),
            "Dropped" => Ok(Self::Dropped),
            _ => Err("Invalid status. Use: Active, Completed, or Dropped.".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "letter_grade")]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

/// A student's registration in a course.
///
/// At most one exists per (student, course) pair regardless of status.
/// Only `Active` rows count against the course capacity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub grade: Option<LetterGrade>,
    pub marks: Option<f64>,
    pub attendance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An enrollment with student and course summaries attached.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentWithRelations {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub enrollment: Enrollment,
    #[sqlx(flatten)]
    pub student: StudentSummary,
    #[sqlx(flatten)]
    pub course: CourseSummary,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentDto {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

/// Partial update. `grade` and `marks` accept `null` to clear the value;
/// leaving a field out keeps it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_enrollment_changes"))]
pub struct UpdateEnrollmentDto {
    pub status: Option<EnrollmentStatus>,
    #[serde(default, deserialize_with = "crate::present_or_null")]
    #[schema(value_type = Option<LetterGrade>)]
    pub grade: Option<Option<LetterGrade>>,
    #[serde(default, deserialize_with = "crate::present_or_null")]
    #[schema(value_type = Option<f64>)]
    pub marks: Option<Option<f64>>,
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "Attendance must be between 0 and 100."
    ))]
    pub attendance: Option<f64>,
}

const MARKS_OUT_OF_RANGE: &str = "Marks must be between 0 and 100.";

fn validate_enrollment_changes(
    dto: &UpdateEnrollmentDto,
) -> Result<(), validator::ValidationError> {
    if dto.status.is_none() && dto.grade.is_none() && dto.marks.is_none() && dto.attendance.is_none()
    {
        return Err(crate::no_changes_error());
    }
    if let Some(Some(marks)) = dto.marks {
        if !(0.0..=100.0).contains(&marks) {
            return Err(validator::ValidationError::new("range")
                .with_message(std::borrow::Cow::Borrowed(MARKS_OUT_OF_RANGE)));
        }
    }
    Ok(())
}
