use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::AppError;
use schoolhub_db::is_unique_violation;
use schoolhub_models::enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentStatus, EnrollmentWithRelations,
    UpdateEnrollmentDto,
};
use schoolhub_models::stats::{CourseEnrollmentStats, GradeReport};

const ENROLLMENT_COLUMNS: &str =
    "id, student_id, course_id, enrollment_date, status, grade, marks, attendance, created_at, updated_at";

const ENROLLMENT_WITH_RELATIONS: &str = "SELECT e.id, e.student_id, e.course_id,
        e.enrollment_date, e.status, e.grade, e.marks, e.attendance,
        e.created_at, e.updated_at,
        s.first_name AS student_first_name,
        s.last_name AS student_last_name,
        s.email AS student_email,
        s.class_level AS student_class_level,
        c.title AS course_title,
        c.code AS course_code,
        c.credits AS course_credits,
        c.class_level AS course_class_level,
        c.semester AS course_semester
     FROM enrollments e
     JOIN students s ON s.id = e.student_id
     JOIN courses c ON c.id = e.course_id";

const ALREADY_ENROLLED: &str = "Student is already enrolled in this course.";
const COURSE_FULL: &str = "Course is full. Cannot enroll more students.";

pub struct EnrollmentService;

impl EnrollmentService {
    /// Locks the course row and returns its capacity. Enrollment inserts and
    /// re-activations run after this inside one transaction, so concurrent
    /// requests for the same course are serialised.
    async fn lock_course(conn: &mut PgConnection, course_id: Uuid) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT max_students FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found.")))
    }

    async fn ensure_free_seat(
        conn: &mut PgConnection,
        course_id: Uuid,
        max_students: i32,
    ) -> Result<(), AppError> {
        let active = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND status = 'Active'",
        )
        .bind(course_id)
        .fetch_one(&mut *conn)
        .await?;

        if active >= i64::from(max_students) {
            return Err(AppError::conflict(anyhow!(COURSE_FULL)));
        }
        Ok(())
    }

    /// Enrolls a student. The pair must be new in any status, and the course
    /// must have a free seat among its Active enrollments.
    #[instrument(skip(db))]
    pub async fn create_enrollment(
        db: &PgPool,
        dto: CreateEnrollmentDto,
    ) -> Result<EnrollmentWithRelations, AppError> {
        let mut tx = db.begin().await?;

        let student_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(dto.student_id)
                .fetch_one(&mut *tx)
                .await?;

        if !student_exists {
            return Err(AppError::not_found(anyhow!("Student not found.")));
        }

        let max_students = Self::lock_course(&mut *tx, dto.course_id).await?;

        let already_enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(dto.student_id)
        .bind(dto.course_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_enrolled {
            return Err(AppError::conflict(anyhow!(ALREADY_ENROLLED)));
        }

        Self::ensure_free_seat(&mut *tx, dto.course_id, max_students).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(dto.student_id)
        .bind(dto.course_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!(ALREADY_ENROLLED))
            } else {
                AppError::database(e)
            }
        })?;

        tx.commit().await?;

        tracing::info!(
            enrollment_id = %id,
            student_id = %dto.student_id,
            course_id = %dto.course_id,
            "Student enrolled"
        );
        Self::get_enrollment_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments_by_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentWithRelations>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithRelations>(&format!(
            "{ENROLLMENT_WITH_RELATIONS} WHERE e.student_id = $1 ORDER BY e.enrollment_date DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        if enrollments.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No enrollments found for this student."
            )));
        }

        Ok(enrollments)
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments_by_course(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<EnrollmentWithRelations>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithRelations>(&format!(
            "{ENROLLMENT_WITH_RELATIONS} WHERE e.course_id = $1 ORDER BY e.enrollment_date DESC"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        if enrollments.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No enrollments found for this course."
            )));
        }

        Ok(enrollments)
    }

    #[instrument(skip(db))]
    pub async fn get_enrollment_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<EnrollmentWithRelations, AppError> {
        sqlx::query_as::<_, EnrollmentWithRelations>(&format!(
            "{ENROLLMENT_WITH_RELATIONS} WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enrollment not found.")))
    }

    /// Applies a partial update; an explicit `null` clears grade or marks.
    /// Moving a Completed or Dropped enrollment back to Active takes a seat
    /// and is refused when the course is full.
    #[instrument(skip(db))]
    pub async fn update_enrollment(
        db: &PgPool,
        id: Uuid,
        dto: UpdateEnrollmentDto,
    ) -> Result<EnrollmentWithRelations, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enrollment not found.")))?;

        if dto.status == Some(EnrollmentStatus::Active)
            && current.status != EnrollmentStatus::Active
        {
            let max_students = Self::lock_course(&mut *tx, current.course_id).await?;
            Self::ensure_free_seat(&mut *tx, current.course_id, max_students).await?;
        }

        sqlx::query(
            "UPDATE enrollments SET
                status = COALESCE($2, status),
                grade = CASE WHEN $3 THEN $4 ELSE grade END,
                marks = CASE WHEN $5 THEN $6 ELSE marks END,
                attendance = COALESCE($7, attendance),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(dto.status)
        .bind(dto.grade.is_some())
        .bind(dto.grade.flatten())
        .bind(dto.marks.is_some())
        .bind(dto.marks.flatten())
        .bind(dto.attendance)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::get_enrollment_by_id(db, id).await
    }

    /// Deletes the enrollment together with its attendance records.
    #[instrument(skip(db))]
    pub async fn delete_enrollment(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Enrollment not found.")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_course_stats(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<CourseEnrollmentStats, AppError> {
        let (title, max_students) = sqlx::query_as::<_, (String, i32)>(
            "SELECT title, max_students FROM courses WHERE id = $1",
        )
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found.")))?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE course_id = $1"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(CourseEnrollmentStats::compute(
            &title,
            max_students,
            &enrollments,
        ))
    }

    #[instrument(skip(db))]
    pub async fn get_student_grade_report(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<GradeReport, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithRelations>(&format!(
            "{ENROLLMENT_WITH_RELATIONS}
             WHERE e.student_id = $1 AND e.status IN ('Active', 'Completed')
             ORDER BY e.enrollment_date DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        GradeReport::compute(student_id, enrollments).ok_or_else(|| {
            AppError::not_found(anyhow!("No enrollment records found for this student."))
        })
    }
}
