use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_presence, login_student, login_teacher, logout};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/teachers/login", post(login_teacher))
        .route("/students/login", post(login_student))
        .route("/logout", post(logout))
        .route("/presence/{identity_id}", get(get_presence))
}
