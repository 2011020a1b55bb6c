pub mod attendance;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod students;
pub mod teachers;
