use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_auth::{Role, create_access_token};
use schoolhub_config::JwtConfig;
use schoolhub_core::{AppError, verify_password};
use schoolhub_models::sessions::{
    IdentityKind, LoginRequest, Presence, StudentLoginResponse, TeacherLoginResponse,
};
use schoolhub_models::students::{STUDENT_COLUMNS, StudentCredentials};
use schoolhub_models::teachers::{TEACHER_COLUMNS, TeacherCredentials};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

fn session_lifetime_secs(jwt_config: &JwtConfig) -> f64 {
    jwt_config.access_token_expiry as f64
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login_teacher(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<TeacherLoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, TeacherCredentials>(&format!(
            "SELECT {TEACHER_COLUMNS}, password FROM teachers WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let teacher = credentials.teacher;
        let session_id =
            Self::open_session(db, jwt_config, teacher.id, IdentityKind::Teacher).await?;
        let token = create_access_token(
            teacher.id,
            &teacher.email,
            teacher.role.into(),
            session_id,
            jwt_config,
        )?;

        tracing::info!(teacher_id = %teacher.id, "Teacher logged in");
        Ok(TeacherLoginResponse { token, teacher })
    }

    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login_student(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<StudentLoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, StudentCredentials>(&format!(
            "SELECT {STUDENT_COLUMNS}, password FROM students WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let student = credentials.student;
        let session_id =
            Self::open_session(db, jwt_config, student.id, IdentityKind::Student).await?;
        let token = create_access_token(
            student.id,
            &student.email,
            Role::Student,
            session_id,
            jwt_config,
        )?;

        tracing::info!(student_id = %student.id, "Student logged in");
        Ok(StudentLoginResponse { token, student })
    }

    /// Opens a session and prunes the identity's sessions whose tokens can
    /// no longer be used.
    async fn open_session(
        db: &PgPool,
        jwt_config: &JwtConfig,
        identity_id: Uuid,
        kind: IdentityKind,
    ) -> Result<Uuid, AppError> {
        let mut tx = db.begin().await?;

        let pruned = sqlx::query(
            "DELETE FROM sessions
             WHERE identity_id = $1
               AND created_at <= NOW() - make_interval(secs => $2)",
        )
        .bind(identity_id)
        .bind(session_lifetime_secs(jwt_config))
        .execute(&mut *tx)
        .await?;

        let session_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO sessions (identity_id, identity_kind) VALUES ($1, $2) RETURNING id",
        )
        .bind(identity_id)
        .bind(kind)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if pruned.rows_affected() > 0 {
            tracing::debug!(
                %identity_id,
                pruned = pruned.rows_affected(),
                "Pruned expired sessions"
            );
        }
        Ok(session_id)
    }

    /// Ends the session. Ending an already ended session is a no-op.
    #[instrument(skip(db))]
    pub async fn logout(db: &PgPool, session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET ended_at = NOW() WHERE id = $1 AND ended_at IS NULL")
            .bind(session_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// True while the session has neither been ended nor outlived the token
    /// lifetime. Refreshes `last_seen_at`.
    pub async fn is_session_open(
        db: &PgPool,
        jwt_config: &JwtConfig,
        session_id: Uuid,
    ) -> Result<bool, AppError> {
        let touched = sqlx::query_scalar::<_, Uuid>(
            "UPDATE sessions SET last_seen_at = NOW()
             WHERE id = $1
               AND ended_at IS NULL
               AND created_at > NOW() - make_interval(secs => $2)
             RETURNING id",
        )
        .bind(session_id)
        .bind(session_lifetime_secs(jwt_config))
        .fetch_optional(db)
        .await?;

        Ok(touched.is_some())
    }

    /// Sessions older than the token lifetime count as ended.
    #[instrument(skip(db, jwt_config))]
    pub async fn presence(
        db: &PgPool,
        jwt_config: &JwtConfig,
        identity_id: Uuid,
    ) -> Result<Presence, AppError> {
        let known = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)
                 OR EXISTS(SELECT 1 FROM students WHERE id = $1)",
        )
        .bind(identity_id)
        .fetch_one(db)
        .await?;

        if !known {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No teacher or student found with this ID."
            )));
        }

        let presence = sqlx::query_as::<_, Presence>(
            "SELECT $1::uuid AS identity_id,
                    COUNT(*) FILTER (WHERE live) > 0 AS is_online,
                    COUNT(*) FILTER (WHERE live) AS active_sessions,
                    MAX(created_at) AS last_logged_in
             FROM (
                 SELECT created_at,
                        ended_at IS NULL
                            AND created_at > NOW() - make_interval(secs => $2) AS live
                 FROM sessions
                 WHERE identity_id = $1
             ) s",
        )
        .bind(identity_id)
        .bind(session_lifetime_secs(jwt_config))
        .fetch_one(db)
        .await?;

        Ok(presence)
    }
}
