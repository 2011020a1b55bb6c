//! # SchoolHub Models
//!
//! Domain models and DTOs for the SchoolHub API: database rows, request
//! bodies with their validation rules, and the statistics derived from the
//! enrollment ledger and attendance journal.
//!
//! # Modules
//!
//! - [`common`]: Shared enums and the summaries attached to joined rows
//! - [`teachers`]: Teacher identity records
//! - [`students`]: Student identity records
//! - [`courses`]: Course registry
//! - [`enrollments`]: Enrollment ledger
//! - [`attendance`]: Attendance journal
//! - [`sessions`]: Login sessions, presence and login payloads
//! - [`stats`]: Occupancy, averages and attendance percentages
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_models::attendance::AttendanceStatus;
//! use schoolhub_models::stats::AttendanceStats;
//!
//! let stats = AttendanceStats::from_statuses(&[AttendanceStatus::Present, AttendanceStatus::Late]);
//! assert_eq!(stats.unwrap().attendance_percentage, "100.00%");
//! ```

pub mod attendance;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod sessions;
pub mod stats;
pub mod students;
pub mod teachers;

pub use attendance::{
    Attendance, AttendanceStatus, AttendanceWithRelations, MarkAttendanceDto, UpdateAttendanceDto,
};
pub use common::{
    ClassLevel, CourseSummary, EnrollmentSummary, Gender, StudentSummary, TeacherSummary,
};
pub use courses::{Course, CourseWithTeacher, CreateCourseDto, UpdateCourseDto};
pub use enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentStatus, EnrollmentWithRelations, LetterGrade,
    UpdateEnrollmentDto,
};
pub use sessions::{
    IdentityKind, LoginRequest, Presence, Session, StudentLoginResponse, TeacherLoginResponse,
};
pub use stats::{AttendanceStats, CourseEnrollmentStats, GradeReport};
pub use students::{
    CreateStudentDto, Guardian, GuardianDto, Student, StudentRole, UpdateStudentDto,
};
pub use teachers::{CreateTeacherDto, Teacher, TeacherRole, UpdateTeacherDto};

/// Message returned when a partial update carries no fields.
pub const NO_CHANGES_MESSAGE: &str = "At least one field must be provided to update.";

pub(crate) fn no_changes_error() -> validator::ValidationError {
    validator::ValidationError::new("no_changes")
        .with_message(std::borrow::Cow::Borrowed(NO_CHANGES_MESSAGE))
}

/// Deserializes a nullable field of a partial update. Used with
/// `#[serde(default)]`: an absent field stays `None`, an explicit `null`
/// becomes `Some(None)` and clears the column.
pub(crate) fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}
