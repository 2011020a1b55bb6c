//! Seed rows and the knobs controlling how many are generated.

use chrono::NaiveDate;
use schoolhub_models::{ClassLevel, Gender};
use uuid::Uuid;

/// Domain of every seeded email; clearing deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.schoolhub.test";

/// Password given to every seeded teacher and student.
pub const SEED_PASSWORD: &str = "password123";

pub struct TeacherSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Gender,
    pub subjects: Vec<String>,
}

pub struct StudentSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub class_level: ClassLevel,
    pub grade: String,
    pub guardian_name: String,
    pub guardian_contact: String,
}

pub struct CourseSeed {
    pub title: String,
    pub code: String,
    pub credits: i16,
    pub class_level: ClassLevel,
    pub teacher_id: Uuid,
    pub semester: i16,
    pub max_students: i32,
}

/// A seeded course with what enrollment planning needs.
#[derive(Debug, Clone, Copy)]
pub struct SeededCourse {
    pub id: Uuid,
    pub max_students: i32,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub courses_per_teacher: usize,
    pub enrollments_per_student: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 8,
            students: 120,
            courses_per_teacher: 2,
            enrollments_per_student: 3,
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize) -> Self {
        Self {
            teachers,
            ..Default::default()
        }
    }

    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    pub fn with_courses_per_teacher(mut self, courses: usize) -> Self {
        self.courses_per_teacher = courses;
        self
    }

    pub fn with_enrollments_per_student(mut self, enrollments: usize) -> Self {
        self.enrollments_per_student = enrollments;
        self
    }

    pub fn total_courses(&self) -> usize {
        self.teachers * self.courses_per_teacher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = SeedConfig::new(4)
            .with_students(10)
            .with_courses_per_teacher(3)
            .with_enrollments_per_student(1);

        assert_eq!(config.teachers, 4);
        assert_eq!(config.students, 10);
        assert_eq!(config.total_courses(), 12);
        assert_eq!(config.enrollments_per_student, 1);
    }
}
