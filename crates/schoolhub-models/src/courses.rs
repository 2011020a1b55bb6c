//! Course registry models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{ClassLevel, TeacherSummary};

/// A course. `max_students` caps the number of Active enrollments.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i16,
    pub class_level: ClassLevel,
    pub teacher_id: Uuid,
    pub semester: i16,
    pub max_students: i32,
    pub schedule: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course with its assigned teacher.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseWithTeacher {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    #[sqlx(flatten)]
    pub teacher: TeacherSummary,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 50, message = "Code is required"))]
    pub code: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Credits must be between 1 and 6"))]
    pub credits: i16,
    pub class_level: ClassLevel,
    pub teacher_id: Uuid,
    #[validate(range(min = 1, max = 2, message = "Semester must be 1 or 2"))]
    pub semester: i16,
    #[validate(range(min = 1, message = "Max students must be at least 1"))]
    pub max_students: i32,
    #[validate(length(max = 100))]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_course_changes"))]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Credits must be between 1 and 6"))]
    pub credits: Option<i16>,
    pub class_level: Option<ClassLevel>,
    pub teacher_id: Option<Uuid>,
    #[validate(range(min = 1, max = 2, message = "Semester must be 1 or 2"))]
    pub semester: Option<i16>,
    #[validate(range(min = 1, message = "Max students must be at least 1"))]
    pub max_students: Option<i32>,
    #[validate(length(max = 100))]
    pub schedule: Option<String>,
}

fn validate_course_changes(dto: &UpdateCourseDto) -> Result<(), validator::ValidationError> {
    let empty = dto.title.is_none()
        && dto.code.is_none()
        && dto.description.is_none()
        && dto.credits.is_none()
        && dto.class_level.is_none()
        && dto.teacher_id.is_none()
        && dto.semester.is_none()
        && dto.max_students.is_none()
        && dto.schedule.is_none();

    if empty {
        return Err(crate::no_changes_error());
    }
    Ok(())
}
