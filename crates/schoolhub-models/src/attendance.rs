//! Attendance journal models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{CourseSummary, EnrollmentSummary, StudentSummary, TeacherSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status")]
#[serde(try_from = "String")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    /// Present and Late both count as attended.
    pub fn is_attended(self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            "Late" => Ok(Self::Late),
            "Excused" => Ok(Self::Excused),
            _ => Err("Invalid status. Use: Present, Absent, Late, or Excused.".to_string()),
        }
    }
}

/// One attendance mark. Unique per (student, course, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_id: Uuid,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceWithRelations {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: Attendance,
    #[sqlx(flatten)]
    pub student: StudentSummary,
    #[sqlx(flatten)]
    pub course: CourseSummary,
    #[sqlx(flatten)]
    pub enrollment: EnrollmentSummary,
    /// Teacher who recorded the mark.
    #[sqlx(flatten)]
    pub recorder: TeacherSummary,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceDto {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_id: Uuid,
    /// Calendar date, `YYYY-MM-DD`.
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    pub recorded_by: Uuid,
}

/// Partial update. `remarks: null` clears the remarks.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_attendance_changes"))]
pub struct UpdateAttendanceDto {
    pub status: Option<AttendanceStatus>,
    #[serde(default, deserialize_with = "crate::present_or_null")]
    #[schema(value_type = Option<String>)]
    pub remarks: Option<Option<String>>,
}

fn validate_attendance_changes(
    dto: &UpdateAttendanceDto,
) -> Result<(), validator::ValidationError> {
    if dto.status.is_none() && dto.remarks.is_none() {
        return Err(crate::no_changes_error());
    }
    if let Some(Some(remarks)) = &dto.remarks {
        if remarks.chars().count() > 500 {
            return Err(validator::ValidationError::new("length").with_message(
                std::borrow::Cow::Borrowed("Remarks must be at most 500 characters."),
            ));
        }
    }
    Ok(())
}
