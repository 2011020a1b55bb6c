//! Enums shared by several entities, and the compact summaries attached to
//! joined rows for display.
//!
//! Summaries read prefixed column aliases (`student_first_name`,
//! `course_code`, `teacher_email`, ...) so they can be flattened into any
//! joined query row.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::enrollments::EnrollmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "class_level")]
pub enum ClassLevel {
    Primary,
    Secondary,
}

impl FromStr for ClassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Primary" => Ok(Self::Primary),
            "Secondary" => Ok(Self::Secondary),
            _ => Err("Invalid class level. Use: Primary or Secondary.".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentSummary {
    #[sqlx(rename = "student_id")]
    pub id: Uuid,
    #[sqlx(rename = "student_first_name")]
    pub first_name: String,
    #[sqlx(rename = "student_last_name")]
    pub last_name: String,
    #[sqlx(rename = "student_email")]
    pub email: String,
    #[sqlx(rename = "student_class_level")]
    pub class_level: ClassLevel,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseSummary {
    #[sqlx(rename = "course_id")]
    pub id: Uuid,
    #[sqlx(rename = "course_title")]
    pub title: String,
    #[sqlx(rename = "course_code")]
    pub code: String,
    #[sqlx(rename = "course_credits")]
    pub credits: i16,
    #[sqlx(rename = "course_class_level")]
    pub class_level: ClassLevel,
    #[sqlx(rename = "course_semester")]
    pub semester: i16,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TeacherSummary {
    #[sqlx(rename = "teacher_id")]
    pub id: Uuid,
    #[sqlx(rename = "teacher_first_name")]
    pub first_name: String,
    #[sqlx(rename = "teacher_last_name")]
    pub last_name: String,
    #[sqlx(rename = "teacher_email")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentSummary {
    #[sqlx(rename = "enrollment_id")]
    pub id: Uuid,
    #[sqlx(rename = "enrollment_status")]
    pub status: EnrollmentStatus,
    #[sqlx(rename = "enrollment_date")]
    pub enrollment_date: DateTime<Utc>,
}
