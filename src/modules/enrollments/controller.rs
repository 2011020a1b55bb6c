use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, MessageResponse};
use schoolhub_models::enrollments::{
    CreateEnrollmentDto, EnrollmentWithRelations, UpdateEnrollmentDto,
};
use schoolhub_models::stats::{CourseEnrollmentStats, GradeReport};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Student enrolled", body = EnrollmentWithRelations),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Student or course not found", body = MessageResponse),
        (status = 409, description = "Already enrolled, or course is full", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<EnrollmentWithRelations>>), AppError> {
    let enrollment = EnrollmentService::create_enrollment(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Student enrolled successfully.", enrollment)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollments of the student, newest first", body = Vec<EnrollmentWithRelations>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No enrollments found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_enrollments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(student_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<EnrollmentWithRelations>>>, AppError> {
    let enrollments = EnrollmentService::get_enrollments_by_student(&state.db, student_id).await?;
    Ok(Json(ApiResponse::list(
        "Enrollments retrieved successfully.",
        enrollments,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/student/{student_id}/grades",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Grade report over Active and Completed enrollments", body = GradeReport),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No enrollment records found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_grade_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(student_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<GradeReport>>, AppError> {
    let report = EnrollmentService::get_student_grade_report(&state.db, student_id).await?;
    Ok(Json(ApiResponse::ok(
        "Student grade report retrieved successfully.",
        report,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/course/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrollments of the course, newest first", body = Vec<EnrollmentWithRelations>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No enrollments found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_enrollments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(course_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<EnrollmentWithRelations>>>, AppError> {
    let enrollments = EnrollmentService::get_enrollments_by_course(&state.db, course_id).await?;
    Ok(Json(ApiResponse::list(
        "Enrollments retrieved successfully.",
        enrollments,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/course/{course_id}/stats",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Occupancy and averages for the course", body = CourseEnrollmentStats),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "Course not found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_enrollment_stats(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(course_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<CourseEnrollmentStats>>, AppError> {
    let stats = EnrollmentService::get_course_stats(&state.db, course_id).await?;
    Ok(Json(ApiResponse::ok(
        "Course enrollment statistics retrieved successfully.",
        stats,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment details", body = EnrollmentWithRelations),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "Enrollment not found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_enrollment_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<EnrollmentWithRelations>>, AppError> {
    let enrollment = EnrollmentService::get_enrollment_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(
        "Enrollment retrieved successfully.",
        enrollment,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentWithRelations),
        (status = 400, description = "No fields, unknown status, or marks/attendance outside 0-100", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Enrollment not found", body = MessageResponse),
        (status = 409, description = "Re-activation would exceed capacity", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<ApiResponse<EnrollmentWithRelations>>, AppError> {
    let enrollment = EnrollmentService::update_enrollment(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::ok(
        "Enrollment updated successfully.",
        enrollment,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment and its attendance deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Enrollment not found", body = MessageResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    EnrollmentService::delete_enrollment(&state.db, id).await?;
    Ok(Json(MessageResponse::success(
        "Enrollment deleted successfully.",
    )))
}
