use serde_json::{Value, json};

use crate::utils::{location, spawn_app, spawn_backend};
mod utils;

#[tokio::test]
async fn students_cannot_write_lessons() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;
    let after_login = backend.hits();

    let response = app
        .client
        .post(app.url("/student/api/lessons"))
        .json(&json!({ "title": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .delete(app.url("/student/api/courses/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    assert_eq!(backend.hits(), after_login);
}

#[tokio::test]
async fn lecturers_create_lessons() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("lecturer@x.com", "lecturer-pass").await;

    let response = app
        .client
        .post(app.url("/lecturer/api/lessons"))
        .json(&json!({ "title": "Parsing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["title"], "Parsing");

    let forwarded = backend.requests_to("/api/lessons");
    assert_eq!(forwarded[0].method, "POST");
    assert_eq!(forwarded[0].user_role.as_deref(), Some("lecturer"));
}

#[tokio::test]
async fn students_submit_work() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;

    let response = app
        .client
        .post(app.url("/student/api/submissions"))
        .json(&json!({ "assignment": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn reads_are_relayed_with_their_query() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;

    let response = app.get("/student/api/lessons?courseId=3").await;
    assert_eq!(response.status(), 200);
    let lessons: Value = response.json().await.unwrap();
    assert_eq!(lessons[0]["title"], "Intro to parsing");
    assert_eq!(backend.requests_to("/api/lessons")[0].query, "courseId=3");

    let response = app.get("/student/api/lessons/missing").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No such record");
}

#[tokio::test]
async fn unknown_collections_are_not_found() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("admin@x.com", "admin-pass").await;
    let after_login = backend.hits();

    let response = app.get("/admin/api/grades").await;
    assert_eq!(response.status(), 404);
    assert_eq!(backend.hits(), after_login);
}

#[tokio::test]
async fn resource_routes_follow_the_role_gate() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;

    let response = app.get("/lecturer/api/lessons").await;
    assert_eq!(response.status(), 302);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn record_ids_cannot_escape_their_collection() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;
    let after_login = backend.hits();

    let response = app
        .client
        .patch(app.url("/student/api/submissions/..%2Fcourses%2F1"))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = app
        .client
        .delete(app.url("/student/api/submissions/..%2Fcourses%2F1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = app.get("/student/api/courses/x%3Fall%3D1").await;
    assert_eq!(response.status(), 404);
    let response = app.get("/student/api/courses/x%23top").await;
    assert_eq!(response.status(), 404);

    assert_eq!(backend.hits(), after_login);
    assert!(backend.requests_to("/api/courses/1").is_empty());
}

#[tokio::test]
async fn plain_record_ids_are_forwarded() {
    let backend = spawn_backend(&[]).await;
    let app = spawn_app(&backend.base_url).await;
    app.login("student@x.com", "student-pass").await;

    let response = app
        .client
        .patch(app.url("/student/api/submissions/30"))
        .json(&json!({ "status": "submitted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let forwarded = backend.requests_to("/api/submissions/30");
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].method, "PATCH");
    assert_eq!(forwarded[0].query, "");
}
