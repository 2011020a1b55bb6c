use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{AppError, PaginationParams, hash_password};
use schoolhub_db::{is_foreign_key_violation, is_unique_violation};
use schoolhub_models::students::{
    CreateStudentDto, STUDENT_COLUMNS, Student, StudentRole, UpdateStudentDto,
};

fn duplicate_email(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow!("Student with this email already exists."))
    } else {
        AppError::database(err)
    }
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students
                (first_name, last_name, email, password, gender, role, dob,
                 class_level, grade, guardian_name, guardian_contact)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.gender)
        .bind(dto.role.unwrap_or(StudentRole::Student))
        .bind(dto.dob)
        .bind(dto.class_level)
        .bind(&dto.grade)
        .bind(&dto.guardian.name)
        .bind(&dto.guardian.contact_number)
        .fetch_one(db)
        .await
        .map_err(duplicate_email)?;

        tracing::info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        if students.is_empty() {
            return Err(AppError::not_found(anyhow!("No students found.")));
        }

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found.")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;
        let (guardian_name, guardian_contact) = match &dto.guardian {
            Some(guardian) => (
                Some(guardian.name.as_str()),
                Some(guardian.contact_number.as_str()),
            ),
            None => (None, None),
        };

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                gender = COALESCE($6, gender),
                role = COALESCE($7, role),
                dob = COALESCE($8, dob),
                class_level = COALESCE($9, class_level),
                grade = COALESCE($10, grade),
                guardian_name = COALESCE($11, guardian_name),
                guardian_contact = COALESCE($12, guardian_contact),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.gender)
        .bind(dto.role)
        .bind(dto.dob)
        .bind(dto.class_level)
        .bind(&dto.grade)
        .bind(guardian_name)
        .bind(guardian_contact)
        .fetch_optional(db)
        .await
        .map_err(duplicate_email)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found.")))
    }

    /// Deletes a student and their sessions. A student with enrollments or
    /// attendance cannot be deleted.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE identity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::conflict(anyhow!(
                        "Student still has enrollments and cannot be deleted."
                    ))
                } else {
                    AppError::database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found.")));
        }

        tx.commit().await?;
        Ok(())
    }
}
