mod common;

use common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use school_service::models::Role;
use serde_json::{json, Value};

#[tokio::test]
async fn seeded_admin_can_sign_in() {
    let app = TestApp::spawn().await;

    let response = app.login("Admin@Test.com", ADMIN_PASSWORD).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = TestApp::spawn().await;

    let wrong = app.login(ADMIN_EMAIL, "nope").await;
    assert_eq!(wrong.status(), 401);
    let wrong: Value = wrong.json().await.unwrap();

    let unknown = app.login("ghost@test.com", "nope").await;
    assert_eq!(unknown.status(), 401);
    let unknown: Value = unknown.json().await.unwrap();

    assert_eq!(wrong["error"], "Invalid credentials");
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn malformed_login_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/login", None, json!({ "email": "not-an-email", "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let response = app
        .client
        .post(app.url("/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn me_returns_profile_and_requires_a_token() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.get("/auth/me", Some(&token)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["role"], "ADMIN");

    let response = app.get("/auth/me", None).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let response = app.get("/auth/me", Some("garbage")).send().await.unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn admin_creates_teacher_with_one_time_password() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let response = app
        .post(
            "/teachers",
            Some(&admin),
            json!({ "name": "Meera", "email": "Meera@School.com", "phone": "98450" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let teacher: Value = response.json().await.unwrap();
    assert_eq!(teacher["email"], "meera@school.com");
    assert_eq!(teacher["role"], "TEACHER");
    let password = teacher["password"].as_str().unwrap().to_string();
    assert_eq!(password.len(), 8);

    let response = app.login("meera@school.com", &password).await;
    assert_eq!(response.status(), 200);

    let duplicate = app
        .post(
            "/teachers",
            Some(&admin),
            json!({ "name": "Other", "email": "meera@school.com" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), 409);

    let teachers: Value = app
        .get("/teachers", Some(&admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(teachers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn inactive_teacher_is_locked_out() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let teacher = app
        .seed_user("Ravi", "ravi@school.com", "teach123", Role::Teacher)
        .await;

    let response = app
        .put(
            &format!("/users/{}/status", teacher.id),
            Some(&admin),
            json!({ "isActive": false }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app.login("ravi@school.com", "teach123").await;
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Account inactive");
}

#[tokio::test]
async fn admin_resets_credentials() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let teacher = app
        .seed_user("Ravi", "ravi@school.com", "teach123", Role::Teacher)
        .await;

    let response = app
        .put(
            &format!("/users/{}/credentials", teacher.id),
            Some(&admin),
            json!({ "email": "ravi.k@school.com", "password": "fresh-pass" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(app.login("ravi@school.com", "teach123").await.status(), 401);
    assert_eq!(app.login("ravi.k@school.com", "fresh-pass").await.status(), 200);
}

#[tokio::test]
async fn non_admins_cannot_manage_users() {
    let app = TestApp::spawn().await;
    app.seed_user("Ravi", "ravi@school.com", "teach123", Role::Teacher)
        .await;
    let teacher = app.token_for("ravi@school.com", "teach123").await;

    let response = app
        .post(
            "/teachers",
            Some(&teacher),
            json!({ "name": "Sneaky", "email": "sneaky@school.com" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}
