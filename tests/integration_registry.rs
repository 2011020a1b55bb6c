#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use common::{
    PASSWORD, admin_session, create_test_course, create_test_student, create_test_teacher, login,
    send, setup_test_app,
};
use schoolhub_models::TeacherRole;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn course_payload(code: &str, teacher_id: Uuid) -> Value {
    json!({
        "title": "Further Mathematics",
        "code": code,
        "credits": 4,
        "class_level": "Secondary",
        "teacher_id": teacher_id,
        "semester": 2,
        "max_students": 25
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_code_must_be_unique(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(course_payload("FMT301", admin_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["code"], "FMT301");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(course_payload("FMT301", admin_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Course with this code already exists.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_needs_existing_teacher(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&token),
        Some(course_payload("FMT302", Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Teacher not found.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_courses_by_class_level(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin_id, token) = admin_session(&pool, &app).await;
    create_test_course(&pool, admin_id, 20).await;

    let (status, body) = send(&app, "GET", "/api/v1/courses/level/Primary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["class_level"], "Primary");

    let (status, _) = send(&app, "GET", "/api/v1/courses/level/Secondary", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/v1/courses/level/Tertiary", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid class level. Use: Primary or Secondary."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_update_rehashes_password_and_guards_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;
    let (teacher_id, email) = create_test_teacher(&pool, TeacherRole::Teacher).await;
    let (_, taken_email) = create_test_teacher(&pool, TeacherRole::Teacher).await;
    let uri = format!("/api/v1/teachers/{teacher_id}");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "email": taken_email })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Teacher with this email already exists.");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "password": "new-secret-9", "subjects": ["Civic Education"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("password").is_none());
    assert_eq!(body["data"]["subjects"][0], "Civic Education");

    let stored = sqlx::query_scalar::<_, String>("SELECT password FROM teachers WHERE id = $1")
        .bind(teacher_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(stored, "new-secret-9");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/teachers/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/teachers/login",
        None,
        Some(json!({ "email": email, "password": "new-secret-9" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_update_guards_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;
    let (student_id, _) = create_test_student(&pool).await;
    let (_, taken_email) = create_test_student(&pool).await;
    let uri = format!("/api/v1/students/{student_id}");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "email": taken_email })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Student with this email already exists.");

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "grade": "JSS 2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["grade"], "JSS 2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_owning_courses_cannot_be_deleted(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;
    let (teacher_id, _) = create_test_teacher(&pool, TeacherRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher_id, 20).await;
    let uri = format!("/api/v1/teachers/{teacher_id}");

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Teacher still has courses or attendance records and cannot be deleted."
    );

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/courses/{course_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_student_ends_their_sessions(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = admin_session(&pool, &app).await;
    let (student_id, email) = create_test_student(&pool).await;
    let student_token = login(&app, "students", &email).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/students/{student_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sessions =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions WHERE identity_id = $1")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(sessions, 0);

    let (status, _) = send(&app, "GET", "/api/v1/courses", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
