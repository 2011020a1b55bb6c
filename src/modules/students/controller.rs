use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, MessageResponse, PaginationParams};
use schoolhub_models::students::{CreateStudentDto, Student, UpdateStudentDto};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 409, description = "Email already in use", body = MessageResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Student created successfully.", student)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of students", body = Vec<Student>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No students found", body = MessageResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Student>>>, AppError> {
    let (students, total) = StudentService::get_students(&state.db, &pagination).await?;

    Ok(Json(
        ApiResponse::ok("Students retrieved successfully.", students).with_total(total),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = StudentService::get_student_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("Student retrieved successfully.", student)))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse),
        (status = 409, description = "Email already in use", body = MessageResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::ok("Student updated successfully.", student)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Student not found", body = MessageResponse),
        (status = 409, description = "Student still enrolled", body = MessageResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(MessageResponse::success("Student deleted successfully.")))
}
