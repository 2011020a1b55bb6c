use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, MessageResponse, PaginationParams};
use schoolhub_models::common::ClassLevel;
use schoolhub_models::courses::{CourseWithTeacher, CreateCourseDto, UpdateCourseDto};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseWithTeacher),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Teacher not found", body = MessageResponse),
        (status = 409, description = "Course code already in use", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<ApiResponse<CourseWithTeacher>>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Course created successfully.", course)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of courses", body = Vec<CourseWithTeacher>),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No courses found", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<CourseWithTeacher>>>, AppError> {
    let (courses, total) = CourseService::get_courses(&state.db, &pagination).await?;

    Ok(Json(
        ApiResponse::ok("Courses retrieved successfully.", courses).with_total(total),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/level/{class_level}",
    params(("class_level" = ClassLevel, Path, description = "Primary or Secondary")),
    responses(
        (status = 200, description = "Courses for the class level", body = Vec<CourseWithTeacher>),
        (status = 400, description = "Unknown class level", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No courses found", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_courses_by_level(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(class_level): ValidatedPath<String>,
) -> Result<Json<ApiResponse<Vec<CourseWithTeacher>>>, AppError> {
    let class_level = class_level
        .parse::<ClassLevel>()
        .map_err(|e| AppError::bad_request(anyhow!(e)))?;

    let courses = CourseService::get_courses_by_level(&state.db, class_level).await?;
    Ok(Json(ApiResponse::list(
        "Courses retrieved successfully.",
        courses,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with its teacher", body = CourseWithTeacher),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "Course not found", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<CourseWithTeacher>>, AppError> {
    let course = CourseService::get_course_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("Course retrieved successfully.", course)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseWithTeacher),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Course or teacher not found", body = MessageResponse),
        (status = 409, description = "Course code already in use", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<ApiResponse<CourseWithTeacher>>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::ok("Course updated successfully.", course)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 403, description = "Admin only", body = MessageResponse),
        (status = 404, description = "Course not found", body = MessageResponse),
        (status = 409, description = "Course still has enrollments", body = MessageResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(Json(MessageResponse::success("Course deleted successfully.")))
}
