//! Enrollment seeding. Planning is pure so capacity and uniqueness can be
//! checked without a database.

use std::collections::HashSet;
use std::time::Instant;

use fake::Fake;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::SeededCourse;
use super::values_clause;

/// Assigns each student up to `per_student` distinct courses, walking the
/// course list round-robin from a per-student offset and skipping courses
/// that are already full.
pub fn plan_enrollments(
    student_ids: &[Uuid],
    courses: &[SeededCourse],
    per_student: usize,
) -> Vec<(Uuid, Uuid)> {
    let mut seats_left: Vec<i64> = courses.iter().map(|c| i64::from(c.max_students)).collect();
    let mut plan = Vec::with_capacity(student_ids.len() * per_student);

    if courses.is_empty() {
        return plan;
    }

    for (student_idx, &student_id) in student_ids.iter().enumerate() {
        let mut taken = 0;
        for step in 0..courses.len() {
            if taken == per_student {
                break;
            }
            let course_idx = (student_idx + step) % courses.len();
            if seats_left[course_idx] > 0 {
                seats_left[course_idx] -= 1;
                plan.push((student_id, courses[course_idx].id));
                taken += 1;
            }
        }
    }

    plan
}

pub async fn seed_enrollments(
    db: &PgPool,
    student_ids: &[Uuid],
    courses: &[SeededCourse],
    per_student: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let plan = plan_enrollments(student_ids, courses, per_student);
    debug_assert!(!has_duplicate_pairs(&plan));
    println!("📝 Seeding {} enrollments...", plan.len());

    let mut tx = db.begin().await?;

    for chunk in plan.chunks(1000) {
        let query = format!(
            "INSERT INTO enrollments (student_id, course_id, marks, attendance) VALUES {}",
            values_clause(chunk.len(), 4)
        );

        let mut q = sqlx::query(&query);
        for &(student_id, course_id) in chunk {
            let marks = (35..101).fake::<i32>() as f64;
            let attendance = (50..101).fake::<i32>() as f64;
            q = q.bind(student_id).bind(course_id).bind(marks).bind(attendance);
        }

        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} enrollments in {:?}",
        plan.len(),
        start_time.elapsed()
    );
    Ok(plan.len())
}

/// True when some (student, course) pair appears twice.
pub fn has_duplicate_pairs(plan: &[(Uuid, Uuid)]) -> bool {
    let mut seen = HashSet::with_capacity(plan.len());
    !plan.iter().all(|pair| seen.insert(*pair))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(max_students: i32) -> SeededCourse {
        SeededCourse {
            id: Uuid::new_v4(),
            max_students,
        }
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_plan_respects_capacity() {
        let courses = vec![course(2), course(3)];
        let students = ids(10);

        let plan = plan_enrollments(&students, &courses, 2);

        for c in &courses {
            let taken = plan.iter().filter(|(_, course_id)| *course_id == c.id).count();
            assert!(taken <= c.max_students as usize);
        }
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_plan_never_repeats_a_pair() {
        let courses: Vec<_> = (0..4).map(|_| course(100)).collect();
        let students = ids(30);

        let plan = plan_enrollments(&students, &courses, 6);

        // Only four courses exist, so nobody gets more than four.
        assert_eq!(plan.len(), 30 * 4);
        assert!(!has_duplicate_pairs(&plan));
    }

    #[test]
    fn test_plan_without_courses_is_empty() {
        assert!(plan_enrollments(&ids(3), &[], 2).is_empty());
    }

    #[test]
    fn test_has_duplicate_pairs() {
        let pair = (Uuid::new_v4(), Uuid::new_v4());
        assert!(has_duplicate_pairs(&[pair, pair]));
        assert!(!has_duplicate_pairs(&[pair]));
    }
}
