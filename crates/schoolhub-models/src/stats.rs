//! Statistics derived from the enrollment ledger and attendance journal.
//!
//! Everything here is a pure function over rows already loaded; nothing is
//! persisted. Decimals are rendered with two places, percentages with a
//! trailing `%`.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::attendance::AttendanceStatus;
use crate::enrollments::{Enrollment, EnrollmentStatus, EnrollmentWithRelations};

/// Rounds half away from zero to two places, so exact ties such as
/// `72.625` go up before formatting.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

/// Missing marks count as zero.
fn average_marks<'a>(enrollments: impl ExactSizeIterator<Item = &'a Enrollment>) -> f64 {
    mean(enrollments.map(|e| e.marks.unwrap_or(0.0)))
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CourseEnrollmentStats {
    pub course_title: String,
    pub max_capacity: i32,
    pub total_enrolled: usize,
    pub active_students: usize,
    pub completed_students: usize,
    pub dropped_students: usize,
    /// e.g. `"72.50"`
    pub average_marks: String,
    /// e.g. `"88.00%"`
    pub average_attendance: String,
    /// Active enrollments over capacity, e.g. `"40.00%"`
    pub occupancy_rate: String,
}

impl CourseEnrollmentStats {
    /// Averages run over every enrollment of the course, whatever its status.
    pub fn compute(course_title: &str, max_students: i32, enrollments: &[Enrollment]) -> Self {
        let count = |status: EnrollmentStatus| {
            enrollments.iter().filter(|e| e.status == status).count()
        };
        let active = count(EnrollmentStatus::Active);

        Self {
            course_title: course_title.to_string(),
            max_capacity: max_students,
            total_enrolled: enrollments.len(),
            active_students: active,
            completed_students: count(EnrollmentStatus::Completed),
            dropped_students: count(EnrollmentStatus::Dropped),
            average_marks: format!("{:.2}", round2(average_marks(enrollments.iter()))),
            average_attendance: format!(
                "{:.2}%",
                round2(mean(enrollments.iter().map(|e| e.attendance)))
            ),
            occupancy_rate: format!(
                "{:.2}%",
                round2(percentage(active, max_students.max(0) as usize))
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GradeReport {
    pub student_id: Uuid,
    pub total_courses: usize,
    pub total_credits: i64,
    pub average_marks: String,
    pub enrollments: Vec<EnrollmentWithRelations>,
}

impl GradeReport {
    /// Builds the report from a student's enrollments. Dropped enrollments
    /// are excluded. Returns `None` when nothing remains.
    pub fn compute(student_id: Uuid, enrollments: Vec<EnrollmentWithRelations>) -> Option<Self> {
        let counted: Vec<EnrollmentWithRelations> = enrollments
            .into_iter()
            .filter(|e| e.enrollment.status != EnrollmentStatus::Dropped)
            .collect();

        if counted.is_empty() {
            return None;
        }

        let total_credits = counted.iter().map(|e| i64::from(e.course.credits)).sum();
        let average = round2(average_marks(counted.iter().map(|e| &e.enrollment)));

        Some(Self {
            student_id,
            total_courses: counted.len(),
            total_credits,
            average_marks: format!("{average:.2}"),
            enrollments: counted,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    /// (Present + Late) / total, e.g. `"80.00%"`
    pub attendance_percentage: String,
}

impl AttendanceStats {
    /// Returns `None` for an empty journal.
    pub fn from_statuses(statuses: &[AttendanceStatus]) -> Option<Self> {
        if statuses.is_empty() {
            return None;
        }

        let count = |status: AttendanceStatus| statuses.iter().filter(|s| **s == status).count();
        let attended = statuses.iter().filter(|s| s.is_attended()).count();

        Some(Self {
            total: statuses.len(),
            present: count(AttendanceStatus::Present),
            absent: count(AttendanceStatus::Absent),
            late: count(AttendanceStatus::Late),
            excused: count(AttendanceStatus::Excused),
            attendance_percentage: format!(
                "{:.2}%",
                round2(percentage(attended, statuses.len()))
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ClassLevel, CourseSummary, StudentSummary};
    use chrono::Utc;

    fn enrollment(status: EnrollmentStatus, marks: Option<f64>, attendance: f64) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            enrollment_date: Utc::now(),
            status,
            grade: None,
            marks,
            attendance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn with_relations(enrollment: Enrollment, credits: i16) -> EnrollmentWithRelations {
        EnrollmentWithRelations {
            student: StudentSummary {
                id: enrollment.student_id,
                first_name: "Amaka".into(),
                last_name: "Okafor".into(),
                email: "amaka@school.test".into(),
                class_level: ClassLevel::Secondary,
            },
            course: CourseSummary {
                id: enrollment.course_id,
                title: "Chemistry".into(),
                code: "CHM201".into(),
                credits,
                class_level: ClassLevel::Secondary,
                semester: 1,
            },
            enrollment,
        }
    }

    #[test]
    fn test_occupancy_counts_active_only() {
        let mut rows: Vec<Enrollment> = (0..12)
            .map(|_| enrollment(EnrollmentStatus::Active, None, 0.0))
            .collect();
        rows.push(enrollment(EnrollmentStatus::Dropped, None, 0.0));
        rows.push(enrollment(EnrollmentStatus::Completed, None, 0.0));

        let stats = CourseEnrollmentStats::compute("Chemistry", 30, &rows);
        assert_eq!(stats.occupancy_rate, "40.00%");
        assert_eq!(stats.total_enrolled, 14);
        assert_eq!(stats.active_students, 12);
        assert_eq!(stats.dropped_students, 1);
        assert_eq!(stats.completed_students, 1);
    }

    #[test]
    fn test_course_averages_treat_missing_marks_as_zero() {
        let rows = vec![
            enrollment(EnrollmentStatus::Active, Some(80.0), 90.0),
            enrollment(EnrollmentStatus::Completed, Some(65.0), 70.0),
            enrollment(EnrollmentStatus::Dropped, None, 20.0),
        ];
        let stats = CourseEnrollmentStats::compute("Physics", 10, &rows);
        assert_eq!(stats.average_marks, "48.33");
        assert_eq!(stats.average_attendance, "60.00%");
        assert_eq!(stats.occupancy_rate, "10.00%");
    }

    #[test]
    fn test_course_averages_round_ties_up() {
        let rows = vec![
            enrollment(EnrollmentStatus::Active, Some(72.5), 80.5),
            enrollment(EnrollmentStatus::Active, Some(72.75), 80.75),
        ];
        let stats = CourseEnrollmentStats::compute("Geography", 8, &rows);
        assert_eq!(stats.average_marks, "72.63");
        assert_eq!(stats.average_attendance, "80.63%");
        assert_eq!(stats.occupancy_rate, "25.00%");
    }

    #[test]
    fn test_grade_report_rounds_ties_up() {
        let rows = vec![
            with_relations(enrollment(EnrollmentStatus::Active, Some(70.0), 0.0), 2),
            with_relations(enrollment(EnrollmentStatus::Completed, Some(70.25), 0.0), 2),
        ];
        let report = GradeReport::compute(Uuid::new_v4(), rows).unwrap();
        assert_eq!(report.average_marks, "70.13");
    }

    #[test]
    fn test_course_stats_without_enrollments() {
        let stats = CourseEnrollmentStats::compute("Biology", 25, &[]);
        assert_eq!(stats.total_enrolled, 0);
        assert_eq!(stats.average_marks, "0.00");
        assert_eq!(stats.average_attendance, "0.00%");
        assert_eq!(stats.occupancy_rate, "0.00%");
    }

    #[test]
    fn test_grade_report_excludes_dropped() {
        let student_id = Uuid::new_v4();
        let rows = vec![
            with_relations(enrollment(EnrollmentStatus::Active, Some(70.0), 0.0), 3),
            with_relations(enrollment(EnrollmentStatus::Completed, Some(90.0), 0.0), 4),
            with_relations(enrollment(EnrollmentStatus::Dropped, Some(10.0), 0.0), 2),
        ];

        let report = GradeReport::compute(student_id, rows).unwrap();
        assert_eq!(report.total_courses, 2);
        assert_eq!(report.total_credits, 7);
        assert_eq!(report.average_marks, "80.00");
        assert!(
            report
                .enrollments
                .iter()
                .all(|e| e.enrollment.status != EnrollmentStatus::Dropped)
        );
    }

    #[test]
    fn test_grade_report_empty_when_all_dropped() {
        let rows = vec![with_relations(
            enrollment(EnrollmentStatus::Dropped, Some(50.0), 0.0),
            3,
        )];
        assert!(GradeReport::compute(Uuid::new_v4(), rows).is_none());
    }

    #[test]
    fn test_attendance_percentage_counts_late_as_attended() {
        use AttendanceStatus::*;
        let statuses = [
            Present, Present, Present, Present, Present, Present, Late, Late, Absent, Excused,
        ];
        let stats = AttendanceStats::from_statuses(&statuses).unwrap();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.present, 6);
        assert_eq!(stats.late, 2);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.excused, 1);
        assert_eq!(stats.attendance_percentage, "80.00%");
    }

    #[test]
    fn test_attendance_percentage_rounds_to_two_places() {
        use AttendanceStatus::*;
        let stats = AttendanceStats::from_statuses(&[Present, Absent, Absent]).unwrap();
        assert_eq!(stats.attendance_percentage, "33.33%");
    }

    #[test]
    fn test_empty_attendance_has_no_stats() {
        assert!(AttendanceStats::from_statuses(&[]).is_none());
    }
}
