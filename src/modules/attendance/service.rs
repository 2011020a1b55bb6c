use anyhow::anyhow;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::AppError;
use schoolhub_db::{is_foreign_key_violation, is_unique_violation};
use schoolhub_models::attendance::{
    AttendanceStatus, AttendanceWithRelations, MarkAttendanceDto, UpdateAttendanceDto,
};
use schoolhub_models::stats::AttendanceStats;

const ATTENDANCE_WITH_RELATIONS: &str = "SELECT a.id, a.student_id, a.course_id,
        a.enrollment_id, a.attendance_date, a.status, a.remarks, a.recorded_by,
        a.created_at, a.updated_at,
        s.first_name AS student_first_name,
        s.last_name AS student_last_name,
        s.email AS student_email,
        s.class_level AS student_class_level,
        c.title AS course_title,
        c.code AS course_code,
        c.credits AS course_credits,
        c.class_level AS course_class_level,
        c.semester AS course_semester,
        e.status AS enrollment_status,
        e.enrollment_date,
        t.id AS teacher_id,
        t.first_name AS teacher_first_name,
        t.last_name AS teacher_last_name,
        t.email AS teacher_email
     FROM attendance a
     JOIN students s ON s.id = a.student_id
     JOIN courses c ON c.id = a.course_id
     JOIN enrollments e ON e.id = a.enrollment_id
     JOIN teachers t ON t.id = a.recorded_by";

const ALREADY_MARKED: &str = "Attendance already marked for this student on this date.";

async fn exists(conn: &mut PgConnection, table: &str, id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// Maps constraint failures on insert. A unique violation means an
/// identical mark won the race; a foreign key violation means a referenced
/// row vanished after it was checked.
fn insert_error(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::conflict(anyhow!(ALREADY_MARKED))
    } else if is_foreign_key_violation(&err) {
        AppError::not_found(anyhow!(
            "Referenced student, course, enrollment or teacher not found."
        ))
    } else {
        AppError::database(err)
    }
}

pub struct AttendanceService;

impl AttendanceService {
    /// Records one mark for a student in a course on a day. The enrollment
    /// must link that same student and course. The checks and the insert
    /// share a transaction holding the enrollment row, so it cannot be
    /// deleted in between.
    #[instrument(skip(db))]
    pub async fn mark_attendance(
        db: &PgPool,
        dto: MarkAttendanceDto,
    ) -> Result<AttendanceWithRelations, AppError> {
        let mut tx = db.begin().await?;

        if !exists(&mut *tx, "students", dto.student_id).await? {
            return Err(AppError::not_found(anyhow!("Student not found.")));
        }
        if !exists(&mut *tx, "courses", dto.course_id).await? {
            return Err(AppError::not_found(anyhow!("Course not found.")));
        }

        let (enrolled_student, enrolled_course) = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT student_id, course_id FROM enrollments WHERE id = $1 FOR SHARE",
        )
        .bind(dto.enrollment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enrollment not found.")))?;

        if enrolled_student != dto.student_id || enrolled_course != dto.course_id {
            return Err(AppError::bad_request(anyhow!(
                "Enrollment does not belong to this student and course."
            )));
        }

        if !exists(&mut *tx, "teachers", dto.recorded_by).await? {
            return Err(AppError::not_found(anyhow!("Teacher not found.")));
        }

        let already_marked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM attendance
                WHERE student_id = $1 AND course_id = $2 AND attendance_date = $3
             )",
        )
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(dto.attendance_date)
        .fetch_one(&mut *tx)
        .await?;

        if already_marked {
            return Err(AppError::conflict(anyhow!(ALREADY_MARKED)));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO attendance
                (student_id, course_id, enrollment_id, attendance_date, status, remarks, recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(dto.enrollment_id)
        .bind(dto.attendance_date)
        .bind(dto.status)
        .bind(&dto.remarks)
        .bind(dto.recorded_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(insert_error)?;

        tx.commit().await?;

        tracing::info!(attendance_id = %id, status = ?dto.status, "Attendance marked");
        Self::get_attendance_by_id(db, id).await
    }

    pub async fn get_attendance_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<AttendanceWithRelations, AppError> {
        sqlx::query_as::<_, AttendanceWithRelations>(&format!(
            "{ATTENDANCE_WITH_RELATIONS} WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Attendance record not found.")))
    }

    #[instrument(skip(db))]
    pub async fn get_student_course_attendance(
        db: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<AttendanceWithRelations>, AppError> {
        let records = sqlx::query_as::<_, AttendanceWithRelations>(&format!(
            "{ATTENDANCE_WITH_RELATIONS}
             WHERE a.student_id = $1 AND a.course_id = $2
             ORDER BY a.attendance_date DESC"
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_all(db)
        .await?;

        if records.is_empty() {
            return Err(AppError::not_found(anyhow!("No attendance records found.")));
        }

        Ok(records)
    }

    #[instrument(skip(db))]
    pub async fn get_attendance_by_date(
        db: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceWithRelations>, AppError> {
        let records = sqlx::query_as::<_, AttendanceWithRelations>(&format!(
            "{ATTENDANCE_WITH_RELATIONS}
             WHERE a.attendance_date = $1
             ORDER BY c.title, s.last_name, s.first_name"
        ))
        .bind(date)
        .fetch_all(db)
        .await?;

        if records.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No attendance records found for this date."
            )));
        }

        Ok(records)
    }

    #[instrument(skip(db))]
    pub async fn get_course_attendance(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<AttendanceWithRelations>, AppError> {
        let records = sqlx::query_as::<_, AttendanceWithRelations>(&format!(
            "{ATTENDANCE_WITH_RELATIONS}
             WHERE a.course_id = $1
             ORDER BY a.attendance_date DESC"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        if records.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No attendance records found for this course."
            )));
        }

        Ok(records)
    }

    #[instrument(skip(db))]
    pub async fn get_student_attendance(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<AttendanceWithRelations>, AppError> {
        let records = sqlx::query_as::<_, AttendanceWithRelations>(&format!(
            "{ATTENDANCE_WITH_RELATIONS}
             WHERE a.student_id = $1
             ORDER BY a.attendance_date DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        if records.is_empty() {
            return Err(AppError::not_found(anyhow!(
                "No attendance records found for this student."
            )));
        }

        Ok(records)
    }

    #[instrument(skip(db))]
    pub async fn update_attendance(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAttendanceDto,
    ) -> Result<AttendanceWithRelations, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE attendance SET
                status = COALESCE($2, status),
                remarks = CASE WHEN $3 THEN $4 ELSE remarks END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(dto.status)
        .bind(dto.remarks.is_some())
        .bind(dto.remarks.flatten())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Attendance record not found.")))?;

        Self::get_attendance_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Attendance record not found.")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_attendance_stats(
        db: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<AttendanceStats, AppError> {
        let statuses = sqlx::query_scalar::<_, AttendanceStatus>(
            "SELECT status FROM attendance WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(db)
        .await?;

        AttendanceStats::from_statuses(&statuses)
            .ok_or_else(|| AppError::not_found(anyhow!("No attendance records found.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_insert_error_keeps_unrelated_failures_internal() {
        let err = insert_error(sqlx::Error::RowNotFound);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
