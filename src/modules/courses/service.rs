use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{AppError, PaginationParams};
use schoolhub_db::{is_foreign_key_violation, is_unique_violation};
use schoolhub_models::common::ClassLevel;
use schoolhub_models::courses::{CourseWithTeacher, CreateCourseDto, UpdateCourseDto};

const COURSE_WITH_TEACHER: &str = "SELECT c.id, c.title, c.code, c.description, c.credits,
        c.class_level, c.teacher_id, c.semester, c.max_students, c.schedule,
        c.created_at, c.updated_at,
        t.first_name AS teacher_first_name,
        t.last_name AS teacher_last_name,
        t.email AS teacher_email
     FROM courses c
     JOIN teachers t ON t.id = c.teacher_id";

fn write_error(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow!("Course with this code already exists."))
    } else if is_foreign_key_violation(&err) {
        AppError::not_found(anyhow!("Teacher not found."))
    } else {
        AppError::database(err)
    }
}

pub struct CourseService;

impl CourseService {
    async fn ensure_teacher_exists(db: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(teacher_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Teacher not found.")));
        }
        Ok(())
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_course(
        db: &PgPool,
        dto: CreateCourseDto,
    ) -> Result<CourseWithTeacher, AppError> {
        Self::ensure_teacher_exists(db, dto.teacher_id).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO courses
                (title, code, description, credits, class_level, teacher_id,
                 semester, max_students, schedule)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(&dto.title)
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.credits)
        .bind(dto.class_level)
        .bind(dto.teacher_id)
        .bind(dto.semester)
        .bind(dto.max_students)
        .bind(&dto.schedule)
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        tracing::info!(course_id = %id, "Course created");
        Self::get_course_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        pagination: &PaginationParams,
    ) -> Result<(Vec<CourseWithTeacher>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;

        let courses = sqlx::query_as::<_, CourseWithTeacher>(&format!(
            "{COURSE_WITH_TEACHER} ORDER BY c.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        if courses.is_empty() {
            return Err(AppError::not_found(anyhow!("No courses found.")));
        }

        Ok((courses, total))
    }

    #[instrument(skip(db))]
    pub async fn get_courses_by_level(
        db: &PgPool,
        class_level: ClassLevel,
    ) -> Result<Vec<CourseWithTeacher>, AppError> {
        let courses = sqlx::query_as::<_, CourseWithTeacher>(&format!(
            "{COURSE_WITH_TEACHER} WHERE c.class_level = $1 ORDER BY c.title"
        ))
        .bind(class_level)
        .fetch_all(db)
        .await?;

        if courses.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No courses found for this class level."
            )));
        }

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: Uuid) -> Result<CourseWithTeacher, AppError> {
        sqlx::query_as::<_, CourseWithTeacher>(&format!("{COURSE_WITH_TEACHER} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found.")))
    }

    /// Lowering `max_students` below the current Active count is allowed;
    /// it only blocks further enrollments.
    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<CourseWithTeacher, AppError> {
        if let Some(teacher_id) = dto.teacher_id {
            Self::ensure_teacher_exists(db, teacher_id).await?;
        }

        sqlx::query_scalar::<_, Uuid>(
            "UPDATE courses SET
                title = COALESCE($2, title),
                code = COALESCE($3, code),
                description = COALESCE($4, description),
                credits = COALESCE($5, credits),
                class_level = COALESCE($6, class_level),
                teacher_id = COALESCE($7, teacher_id),
                semester = COALESCE($8, semester),
                max_students = COALESCE($9, max_students),
                schedule = COALESCE($10, schedule),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.code)
        .bind(&dto.description)
        .bind(dto.credits)
        .bind(dto.class_level)
        .bind(dto.teacher_id)
        .bind(dto.semester)
        .bind(dto.max_students)
        .bind(&dto.schedule)
        .fetch_optional(db)
        .await
        .map_err(write_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found.")))?;

        Self::get_course_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::conflict(anyhow!(
                        "Course still has enrollments and cannot be deleted."
                    ))
                } else {
                    AppError::database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found.")));
        }

        Ok(())
    }
}
