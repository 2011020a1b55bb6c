use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use schoolhub_core::MessageResponse;
use schoolhub_models::{
    Attendance, AttendanceStats, AttendanceStatus, AttendanceWithRelations, ClassLevel, Course,
    CourseEnrollmentStats, CourseSummary, CourseWithTeacher, CreateCourseDto, CreateEnrollmentDto,
    CreateStudentDto, CreateTeacherDto, Enrollment, EnrollmentStatus, EnrollmentSummary,
    EnrollmentWithRelations, Gender, GradeReport, Guardian, GuardianDto, LetterGrade,
    LoginRequest, MarkAttendanceDto, Presence, Student, StudentLoginResponse, StudentRole,
    StudentSummary, Teacher, TeacherLoginResponse, TeacherRole, TeacherSummary,
    UpdateAttendanceDto, UpdateCourseDto, UpdateEnrollmentDto, UpdateStudentDto,
    UpdateTeacherDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_teacher,
        crate::modules::auth::controller::login_student,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::get_presence,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher_by_id,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_id,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_courses_by_level,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::get_student_enrollments,
        crate::modules::enrollments::controller::get_student_grade_report,
        crate::modules::enrollments::controller::get_course_enrollments,
        crate::modules::enrollments::controller::get_course_enrollment_stats,
        crate::modules::enrollments::controller::get_enrollment_by_id,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::get_student_course_attendance,
        crate::modules::attendance::controller::get_attendance_by_date,
        crate::modules::attendance::controller::get_course_attendance,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::attendance::controller::get_attendance_stats,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
    ),
    components(
        schemas(
            MessageResponse,
            LoginRequest,
            TeacherLoginResponse,
            StudentLoginResponse,
            Presence,
            Gender,
            ClassLevel,
            TeacherRole,
            StudentRole,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            Guardian,
            GuardianDto,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            Course,
            CourseWithTeacher,
            CreateCourseDto,
            UpdateCourseDto,
            EnrollmentStatus,
            LetterGrade,
            Enrollment,
            EnrollmentWithRelations,
            CreateEnrollmentDto,
            UpdateEnrollmentDto,
            AttendanceStatus,
            Attendance,
            AttendanceWithRelations,
            MarkAttendanceDto,
            UpdateAttendanceDto,
            StudentSummary,
            CourseSummary,
            TeacherSummary,
            EnrollmentSummary,
            CourseEnrollmentStats,
            GradeReport,
            AttendanceStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, logout and presence"),
        (name = "Teachers", description = "Teacher management endpoints"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Courses", description = "Course registry endpoints"),
        (name = "Enrollments", description = "Enrollment ledger and course statistics"),
        (name = "Attendance", description = "Daily attendance journal and statistics")
    ),
    info(
        title = "SchoolHub API",
        version = "0.1.0",
        description = "School administration REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/auth/teachers/login",
            "/api/v1/teachers",
            "/api/v1/students/{id}",
            "/api/v1/courses/level/{class_level}",
            "/api/v1/enrollments/course/{course_id}/stats",
            "/api/v1/attendance/stats/{student_id}/{course_id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
