//! Fake data for development databases.
//!
//! Rows are generated in parallel with rayon and written with multi-row
//! `INSERT` statements, one transaction per table. Every seeded identity uses
//! an `@seed.schoolhub.test` email, which is how [`clear_all`] finds them.

pub mod courses;
pub mod enrollments;
pub mod identities;
pub mod models;

use std::time::Instant;

use sqlx::PgPool;
use uuid::Uuid;

pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig};

/// `($1, $2), ($3, $4), ...` for `rows` tuples of `columns` parameters.
pub(crate) fn values_clause(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short tag that keeps emails and course codes unique across seed runs.
fn run_tag() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let run = run_tag();

    println!("🌱 Starting database seeding (run {run})...");
    println!("   - Teachers: {}", config.teachers);
    println!("   - Students: {}", config.students);
    println!("   - Courses: {}", config.total_courses());

    // Cheap cost; every seeded identity shares this hash.
    let password_hash = bcrypt::hash(SEED_PASSWORD, 4)?;

    let teacher_ids = identities::seed_teachers(db, config.teachers, &run, &password_hash).await?;
    let student_ids = identities::seed_students(db, config.students, &run, &password_hash).await?;
    let courses =
        courses::seed_courses(db, &teacher_ids, config.courses_per_teacher, &run).await?;
    let enrolled = enrollments::seed_enrollments(
        db,
        &student_ids,
        &courses,
        config.enrollments_per_student,
    )
    .await?;

    println!(
        "\n✅ Seeded {} teachers, {} students, {} courses and {} enrollments in {:?}",
        teacher_ids.len(),
        student_ids.len(),
        courses.len(),
        enrolled,
        start_time.elapsed()
    );
    println!("   Password for every seeded account: {SEED_PASSWORD}");

    Ok(())
}

/// Deletes everything the seeder created. Admins and other real accounts
/// stay, unless they hold enrollments in seeded courses, which are removed.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let pattern = format!("%@{SEED_EMAIL_DOMAIN}");
    let mut tx = db.begin().await?;

    // Attendance rows go with their enrollments.
    let enrollments = sqlx::query(
        "DELETE FROM enrollments
         WHERE student_id IN (SELECT id FROM students WHERE email LIKE $1)
            OR course_id IN (
                SELECT c.id FROM courses c
                JOIN teachers t ON t.id = c.teacher_id
                WHERE t.email LIKE $1
            )",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    // Real attendance recorded by a seeded teacher would block the delete.
    sqlx::query(
        "DELETE FROM attendance
         WHERE recorded_by IN (SELECT id FROM teachers WHERE email LIKE $1)",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?;

    let courses = sqlx::query(
        "DELETE FROM courses
         WHERE teacher_id IN (SELECT id FROM teachers WHERE email LIKE $1)",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        "DELETE FROM sessions
         WHERE identity_id IN (
            SELECT id FROM teachers WHERE email LIKE $1
            UNION ALL
            SELECT id FROM students WHERE email LIKE $1
         )",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?;

    let students = sqlx::query("DELETE FROM students WHERE email LIKE $1")
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let teachers = sqlx::query("DELETE FROM teachers WHERE email LIKE $1")
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} teachers, {} students, {} courses and {} enrollments in {:?}",
        teachers,
        students,
        courses,
        enrollments,
        start_time.elapsed()
    );

    Ok(())
}
