use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    delete_attendance, get_attendance_by_date, get_attendance_stats, get_course_attendance,
    get_student_attendance, get_student_course_attendance, mark_attendance, update_attendance,
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(mark_attendance))
        .route(
            "/student-course/{student_id}/{course_id}",
            get(get_student_course_attendance),
        )
        .route("/date/{date}", get(get_attendance_by_date))
        .route("/course/{course_id}", get(get_course_attendance))
        .route("/student/{student_id}", get(get_student_attendance))
        .route("/stats/{student_id}/{course_id}", get(get_attendance_stats))
        .route("/{id}", put(update_attendance).delete(delete_attendance))
}
