use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{AppError, PaginationParams, hash_password};
use schoolhub_db::{is_foreign_key_violation, is_unique_violation};
use schoolhub_models::teachers::{
    CreateTeacherDto, TEACHER_COLUMNS, Teacher, TeacherRole, UpdateTeacherDto,
};

fn duplicate_email(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow!("Teacher with this email already exists."))
    } else {
        AppError::database(err)
    }
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "INSERT INTO teachers (first_name, last_name, email, password, role, gender, dob, subjects)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.role.unwrap_or(TeacherRole::Teacher))
        .bind(dto.gender)
        .bind(dto.dob)
        .bind(&dto.subjects)
        .fetch_one(db)
        .await
        .map_err(duplicate_email)?;

        tracing::info!(teacher_id = %teacher.id, "Teacher created");
        Ok(teacher)
    }

    /// Returns a page of teachers and the total count.
    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Teacher>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers")
            .fetch_one(db)
            .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        if teachers.is_empty() {
            return Err(AppError::not_found(anyhow!("No teachers found.")));
        }

        Ok((teachers, total))
    }

    #[instrument(skip(db))]
    pub async fn get_teacher_by_id(db: &PgPool, id: Uuid) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found.")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        sqlx::query_as::<_, Teacher>(&format!(
            "UPDATE teachers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                gender = COALESCE($6, gender),
                role = COALESCE($7, role),
                dob = COALESCE($8, dob),
                subjects = COALESCE($9, subjects),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.gender)
        .bind(dto.role)
        .bind(dto.dob)
        .bind(&dto.subjects)
        .fetch_optional(db)
        .await
        .map_err(duplicate_email)?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found.")))
    }

    /// Deletes a teacher and their sessions. A teacher still owning courses
    /// or recorded attendance cannot be deleted.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE identity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::conflict(anyhow!(
                        "Teacher still has courses or attendance records and cannot be deleted."
                    ))
                } else {
                    AppError::database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found.")));
        }

        tx.commit().await?;
        Ok(())
    }
}
