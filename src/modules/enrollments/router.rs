use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_enrollment, delete_enrollment, get_course_enrollment_stats, get_course_enrollments,
    get_enrollment_by_id, get_student_enrollments, get_student_grade_report, update_enrollment,
};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_enrollment))
        .route("/student/{student_id}", get(get_student_enrollments))
        .route("/student/{student_id}/grades", get(get_student_grade_report))
        .route("/course/{course_id}", get(get_course_enrollments))
        .route("/course/{course_id}/stats", get(get_course_enrollment_stats))
        .route(
            "/{id}",
            get(get_enrollment_by_id)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
}
