use axum::{
    Json,
    extract::State,
};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, MessageResponse};
use schoolhub_models::sessions::{
    LoginRequest, Presence, StudentLoginResponse, TeacherLoginResponse,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    post,
    path = "/api/v1/auth/teachers/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TeacherLoginResponse),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Invalid email or password", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TeacherLoginResponse>>, AppError> {
    let response = AuthService::login_teacher(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(ApiResponse::ok("Login successful", response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/students/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = StudentLoginResponse),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Invalid email or password", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<StudentLoginResponse>>, AppError> {
    let response = AuthService::login_student(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(ApiResponse::ok("Login successful", response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session ended", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout(&state.db, auth_user.session_id()).await?;
    Ok(Json(MessageResponse::success("Logout successful.")))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/presence/{identity_id}",
    params(
        ("identity_id" = Uuid, Path, description = "Teacher or student ID")
    ),
    responses(
        (status = 200, description = "Presence of the identity", body = Presence),
        (status = 401, description = "Unauthorized", body = MessageResponse),
        (status = 404, description = "No teacher or student with this ID", body = MessageResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_presence(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(identity_id): ValidatedPath<Uuid>,
) -> Result<Json<ApiResponse<Presence>>, AppError> {
    let presence = AuthService::presence(&state.db, &state.jwt_config, identity_id).await?;
    Ok(Json(ApiResponse::ok(
        "Presence retrieved successfully.",
        presence,
    )))
}
