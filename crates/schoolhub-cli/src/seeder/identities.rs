//! Teacher and student seeding.

use std::time::Instant;

use chrono::NaiveDate;
use fake::faker::name::en::*;
use fake::faker::phone_number::en::CellNumber;
use fake::{Fake, Faker};
use rayon::prelude::*;
use schoolhub_models::{ClassLevel, Gender};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{SEED_EMAIL_DOMAIN, StudentSeed, TeacherSeed};
use super::values_clause;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Biology",
    "Chemistry",
    "Physics",
    "History",
    "Geography",
    "Computer Science",
    "Economics",
    "Art",
];

fn random_gender() -> Gender {
    if Faker.fake::<bool>() {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// `first.last.<run><idx>@seed.schoolhub.test`, keeping only ASCII
/// alphanumerics from the names.
pub fn seed_email(first_name: &str, last_name: &str, run: &str, idx: usize) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    };

    format!(
        "{}.{}.{}{}@{}",
        clean(first_name),
        clean(last_name),
        run,
        idx,
        SEED_EMAIL_DOMAIN
    )
}

pub fn generate_teachers(count: usize, run: &str, password_hash: &str) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let first_subject = (0..SUBJECTS.len()).fake::<usize>();
            let second_subject = (first_subject + 1) % SUBJECTS.len();

            TeacherSeed {
                email: seed_email(&first_name, &last_name, run, idx),
                first_name,
                last_name,
                password_hash: password_hash.to_string(),
                gender: random_gender(),
                subjects: vec![
                    SUBJECTS[first_subject].to_string(),
                    SUBJECTS[second_subject].to_string(),
                ],
            }
        })
        .collect()
}

pub fn generate_students(count: usize, run: &str, password_hash: &str) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let guardian_first: String = FirstName().fake();

            let class_level = if idx % 2 == 0 {
                ClassLevel::Primary
            } else {
                ClassLevel::Secondary
            };
            let (grade, birth_years) = match class_level {
                ClassLevel::Primary => (format!("Primary {}", (1..7).fake::<u8>()), 2014..2019),
                ClassLevel::Secondary => (format!("JSS {}", (1..4).fake::<u8>()), 2008..2014),
            };
            let dob = NaiveDate::from_ymd_opt(
                birth_years.fake::<i32>(),
                (1..13).fake::<u32>(),
                (1..29).fake::<u32>(),
            )
            .unwrap_or_default();

            StudentSeed {
                email: seed_email(&first_name, &last_name, run, idx),
                guardian_name: format!("{} {}", guardian_first, last_name),
                guardian_contact: CellNumber().fake(),
                first_name,
                last_name,
                password_hash: password_hash.to_string(),
                gender: random_gender(),
                dob,
                class_level,
                grade,
            }
        })
        .collect()
}

pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
    run: &str,
    password_hash: &str,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", count);

    let teachers = generate_teachers(count, run, password_hash);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(teachers.len());
    for chunk in teachers.chunks(1000) {
        ids.extend(insert_teachers_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} teachers in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_teachers_chunk(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[TeacherSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO teachers (first_name, last_name, email, password, gender, subjects) VALUES {} RETURNING id",
        values_clause(teachers.len(), 6)
    );

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for teacher in teachers {
        q = q
            .bind(&teacher.first_name)
            .bind(&teacher.last_name)
            .bind(&teacher.email)
            .bind(&teacher.password_hash)
            .bind(teacher.gender)
            .bind(&teacher.subjects);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

pub async fn seed_students(
    db: &PgPool,
    count: usize,
    run: &str,
    password_hash: &str,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_students(count, run, password_hash);

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(students.len());
    // 10 params per student
    for chunk in students.chunks(800) {
        ids.extend(insert_students_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO students
            (first_name, last_name, email, password, gender, dob,
             class_level, grade, guardian_name, guardian_contact)
         VALUES {} RETURNING id",
        values_clause(students.len(), 10)
    );

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for student in students {
        q = q
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.email)
            .bind(&student.password_hash)
            .bind(student.gender)
            .bind(student.dob)
            .bind(student.class_level)
            .bind(&student.grade)
            .bind(&student.guardian_name)
            .bind(&student.guardian_contact);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}
