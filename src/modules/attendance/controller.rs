use anyhow::anyhow;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, MessageResponse};
use schoolhub_models::attendance::{
    AttendanceWithRelations, MarkAttendanceDto, UpdateAttendanceDto,
};
use schoolhub_models::stats::AttendanceStats;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

const RETRIEVED: &str = "Attendance retrieved successfully.";

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(anyhow!("Invalid date format. Use YYYY-MM-DD.")))
}

#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = MarkAttendanceDto,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceWithRelations),
        (status = 400, description = "Invalid input, or enrollment does not match student and course", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Student, course, enrollment or teacher not found", body = MessageResponse),
        (status = 409, description = "Already marked for this date", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceWithRelations>>), AppError> {
    let attendance = AttendanceService::mark_attendance(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Attendance marked successfully.", attendance)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/student-course/{student_id}/{course_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Attendance of the student in the course", body = Vec<AttendanceWithRelations>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No attendance records found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_course_attendance(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath((student_id, course_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Vec<AttendanceWithRelations>>>, AppError> {
    let records =
        AttendanceService::get_student_course_attendance(&state.db, student_id, course_id).await?;
    Ok(Json(ApiResponse::list(RETRIEVED, records)))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/date/{date}",
    params(("date" = String, Path, description = "Calendar date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Attendance taken on the date", body = Vec<AttendanceWithRelations>),
        (status = 400, description = "Malformed date", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No attendance records found for this date", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_attendance_by_date(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(date): ValidatedPath<String>,
) -> Result<Json<ApiResponse<Vec<AttendanceWithRelations>>>, AppError> {
    let date = parse_date(&date)?;
    let records = AttendanceService::get_attendance_by_date(&state.db, date).await?;
    Ok(Json(ApiResponse::list(RETRIEVED, records)))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/course/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Attendance for the course", body = Vec<AttendanceWithRelations>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No attendance records found for this course", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_attendance(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(course_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<AttendanceWithRelations>>>, AppError> {
    let records = AttendanceService::get_course_attendance(&state.db, course_id).await?;
    Ok(Json(ApiResponse::list(RETRIEVED, records)))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance for the student", body = Vec<AttendanceWithRelations>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No attendance records found for this student", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(student_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<AttendanceWithRelations>>>, AppError> {
    let records = AttendanceService::get_student_attendance(&state.db, student_id).await?;
    Ok(Json(ApiResponse::list(RETRIEVED, records)))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats/{student_id}/{course_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Counts per status and attendance percentage", body = AttendanceStats),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No attendance records found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_attendance_stats(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath((student_id, course_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<AttendanceStats>>, AppError> {
    let stats = AttendanceService::get_attendance_stats(&state.db, student_id, course_id).await?;
    Ok(Json(ApiResponse::ok(
        "Attendance statistics retrieved successfully.",
        stats,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceWithRelations),
        (status = 400, description = "No fields, or unknown status", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Attendance record not found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_attendance(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<ApiResponse<AttendanceWithRelations>>, AppError> {
    let attendance = AttendanceService::update_attendance(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::ok(
        "Attendance updated successfully.",
        attendance,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Attendance record not found", body = MessageResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(Json(MessageResponse::success(
        "Attendance deleted successfully.",
    )))
}
