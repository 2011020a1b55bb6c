#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{
    admin_session, create_test_course, create_test_student, enroll, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let course_id = create_test_course(&pool, admin_id, 30).await;

    let (status, body) = enroll(&app, &token, student_id, course_id).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Student enrolled successfully.");
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["student"]["id"], student_id.to_string());
    assert_eq!(body["data"]["course"]["id"], course_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_enrollment_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let course_id = create_test_course(&pool, admin_id, 30).await;

    let (status, _) = enroll(&app, &token, student_id, course_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = enroll(&app, &token, student_id, course_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Student is already enrolled in this course.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_course_frees_a_seat_on_drop(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let course_id = create_test_course(&pool, admin_id, 2).await;

    let (first, _) = create_test_student(&pool).await;
    let (second, _) = create_test_student(&pool).await;
    let (third, _) = create_test_student(&pool).await;

    let (_, body) = enroll(&app, &token, first, course_id).await;
    let first_enrollment = body["data"]["id"].as_str().unwrap().to_string();
    enroll(&app, &token, second, course_id).await;

    let (status, body) = enroll(&app, &token, third, course_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Course is full. Cannot enroll more students.");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/enrollments/{first_enrollment}"),
        Some(&token),
        Some(json!({ "status": "Dropped" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = enroll(&app, &token, third, course_id).await;
    assert_eq!(status, StatusCode::CREATED);

    // The seat is taken again, so the dropped student cannot come back.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/enrollments/{first_enrollment}"),
        Some(&token),
        Some(json!({ "status": "Active" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_enrollment_validates_marks(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let course_id = create_test_course(&pool, admin_id, 30).await;

    let (_, body) = enroll(&app, &token, student_id, course_id).await;
    let uri = format!("/api/v1/enrollments/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "marks": 150 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Marks must be between 0 and 100.");

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "At least one field must be provided to update."
    );

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "status": "Graduated" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid status. Use: Active, Completed, or Dropped."
    );

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "marks": 100, "grade": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["marks"], 100.0);
    assert_eq!(body["data"]["grade"], "A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_stats(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let course_id = create_test_course(&pool, admin_id, 4).await;

    let mut enrollment_ids = Vec::new();
    for _ in 0..3 {
        let (student_id, _) = create_test_student(&pool).await;
        let (_, body) = enroll(&app, &token, student_id, course_id).await;
        enrollment_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    for (id, update) in enrollment_ids.iter().zip([
        json!({ "marks": 80, "attendance": 90 }),
        json!({ "marks": 60, "attendance": 60 }),
        json!({ "status": "Dropped" }),
    ]) {
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/v1/enrollments/{id}"),
            Some(&token),
            Some(update),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/enrollments/course/{course_id}/stats"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["max_capacity"], 4);
    assert_eq!(stats["total_enrolled"], 3);
    assert_eq!(stats["active_students"], 2);
    assert_eq!(stats["dropped_students"], 1);
    // Dropped and unmarked enrollments count as zero.
    assert_eq!(stats["average_marks"], "46.67");
    assert_eq!(stats["average_attendance"], "50.00%");
    assert_eq!(stats["occupancy_rate"], "50.00%");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_report_skips_dropped(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;

    let kept = create_test_course(&pool, admin_id, 10).await;
    let dropped = create_test_course(&pool, admin_id, 10).await;

    let (_, body) = enroll(&app, &token, student_id, kept).await;
    let kept_id = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body) = enroll(&app, &token, student_id, dropped).await;
    let dropped_id = body["data"]["id"].as_str().unwrap().to_string();

    send(
        &app,
        "PUT",
        &format!("/api/v1/enrollments/{kept_id}"),
        Some(&token),
        Some(json!({ "marks": 72.5 })),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/v1/enrollments/{dropped_id}"),
        Some(&token),
        Some(json!({ "status": "Dropped", "marks": 10 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/enrollments/student/{student_id}/grades"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_courses"], 1);
    assert_eq!(body["data"]["total_credits"], 3);
    assert_eq!(body["data"]["average_marks"], "72.50");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lists_are_not_found_when_empty(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let course_id = create_test_course(&pool, admin_id, 10).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/enrollments/course/{course_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_with_enrollments_cannot_be_deleted(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let course_id = create_test_course(&pool, admin_id, 10).await;

    let (_, body) = enroll(&app, &token, student_id, course_id).await;
    let enrollment_id = body["data"]["id"].as_str().unwrap().to_string();

    let course_uri = format!("/api/v1/courses/{course_id}");
    let (status, _) = send(&app, "DELETE", &course_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/enrollments/{enrollment_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &course_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_enrollments_cannot_overfill_course(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let course_id = create_test_course(&pool, admin_id, 1).await;

    let mut students = Vec::new();
    for _ in 0..8 {
        let (student_id, _) = create_test_student(&pool).await;
        students.push(student_id);
    }

    let handles: Vec<_> = students
        .into_iter()
        .map(|student_id| {
            let app = app.clone();
            let token = token.clone();
            tokio::spawn(async move { enroll(&app, &token, student_id, course_id).await.0 })
        })
        .collect();

    let mut created = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => full += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(full, 7);

    let active = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND status = 'Active'",
    )
    .bind(course_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_null_clears_grade_and_marks(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let course_id = create_test_course(&pool, admin_id, 10).await;

    let (_, body) = enroll(&app, &token, student_id, course_id).await;
    let uri = format!("/api/v1/enrollments/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "grade": "B", "marks": 68 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Leaving a field out keeps it.
    let (_, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "attendance": 75 }))).await;
    assert_eq!(body["data"]["grade"], "B");
    assert_eq!(body["data"]["marks"], 68.0);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "status": "Completed", "grade": null, "marks": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");
    assert!(body["data"]["grade"].is_null());
    assert!(body["data"]["marks"].is_null());
    assert_eq!(body["data"]["attendance"], 75.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_ids_use_envelope(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;

    for (method, uri) in [
        ("GET", "/api/v1/enrollments/not-a-uuid"),
        ("DELETE", "/api/v1/attendance/123"),
        ("GET", "/api/v1/attendance/stats/123/456"),
    ] {
        let (status, body) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["success"], false, "{method} {uri}");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid"));
    }
}
