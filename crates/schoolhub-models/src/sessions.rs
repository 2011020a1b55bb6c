//! Login sessions, presence, and the login payloads.
//!
//! A session row is opened on every successful login and closed on logout.
//! An identity is online while at least one of its sessions is open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::students::Student;
use crate::teachers::Teacher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "identity_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Teacher,
    Student,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub identity_kind: IdentityKind,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Derived online state of a teacher or student.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Presence {
    pub identity_id: Uuid,
    pub is_online: bool,
    pub active_sessions: i64,
    pub last_logged_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherLoginResponse {
    pub token: String,
    pub teacher: Teacher,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentLoginResponse {
    pub token: String,
    pub student: Student,
}
