//! Course seeding. Each seeded teacher owns a few courses.

use std::time::Instant;

use fake::Fake;
use rayon::prelude::*;
use schoolhub_models::ClassLevel;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CourseSeed, SeededCourse};
use super::values_clause;

const TITLES: &[&str] = &[
    "Algebra",
    "Creative Writing",
    "Cell Biology",
    "Organic Chemistry",
    "Mechanics",
    "World History",
    "Map Reading",
    "Programming Basics",
    "Microeconomics",
    "Drawing",
];

pub fn generate_courses(teacher_ids: &[Uuid], per_teacher: usize, run: &str) -> Vec<CourseSeed> {
    teacher_ids
        .par_iter()
        .enumerate()
        .flat_map(|(teacher_idx, &teacher_id)| {
            (0..per_teacher)
                .map(|course_idx| {
                    let n = teacher_idx * per_teacher + course_idx;
                    let class_level = if n % 2 == 0 {
                        ClassLevel::Primary
                    } else {
                        ClassLevel::Secondary
                    };

                    CourseSeed {
                        title: format!("{} {}", TITLES[n % TITLES.len()], n / TITLES.len() + 1),
                        code: format!("SEED-{}-{:04}", run.to_uppercase(), n),
                        credits: (1..7).fake::<i16>(),
                        class_level,
                        teacher_id,
                        semester: (course_idx % 2 + 1) as i16,
                        max_students: (15..41).fake::<i32>(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    teacher_ids: &[Uuid],
    per_teacher: usize,
    run: &str,
) -> anyhow::Result<Vec<SeededCourse>> {
    let start_time = Instant::now();
    let courses = generate_courses(teacher_ids, per_teacher, run);
    println!("📚 Seeding {} courses...", courses.len());

    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = db.begin().await?;
    let mut seeded = Vec::with_capacity(courses.len());

    for chunk in courses.chunks(1000) {
        let query = format!(
            "INSERT INTO courses
                (title, code, credits, class_level, teacher_id, semester, max_students)
             VALUES {} RETURNING id",
            values_clause(chunk.len(), 7)
        );

        let mut q = sqlx::query_scalar::<_, Uuid>(&query);
        for course in chunk {
            q = q
                .bind(&course.title)
                .bind(&course.code)
                .bind(course.credits)
                .bind(course.class_level)
                .bind(course.teacher_id)
                .bind(course.semester)
                .bind(course.max_students);
        }

        let ids = q.fetch_all(&mut *tx).await?;
        seeded.extend(ids.into_iter().zip(chunk).map(|(id, course)| SeededCourse {
            id,
            max_students: course.max_students,
        }));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        seeded.len(),
        start_time.elapsed()
    );
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_courses_satisfy_schema_checks() {
        let teachers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let courses = generate_courses(&teachers, 4, "ab12");

        assert_eq!(courses.len(), 12);
        for course in &courses {
            assert!((1..=6).contains(&course.credits));
            assert!(course.semester == 1 || course.semester == 2);
            assert!(course.max_students >= 1);
            assert!(teachers.contains(&course.teacher_id));
        }
    }

    #[test]
    fn test_generated_course_codes_are_unique() {
        let teachers: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let courses = generate_courses(&teachers, 3, "ab12");

        let mut codes: Vec<_> = courses.iter().map(|c| c.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 15);
        assert!(codes.iter().all(|c| c.starts_with("SEED-AB12-")));
    }
}
