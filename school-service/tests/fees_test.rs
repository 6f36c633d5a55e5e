mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn create_invoice(app: &TestApp, admin: &str, student_id: &str, amount: f64) -> Value {
    let response = app
        .post(
            "/fees",
            Some(admin),
            json!({
                "studentId": student_id,
                "title": "Annual Day Costume",
                "amount": amount,
                "dueDate": "2024-06-30"
            }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
async fn invoice_lifecycle_pay_then_approve() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (student, parent) = app.seed_family("STUD100001", "Nursery").await;

    let invoice = create_invoice(&app, &admin, &student.id, 750.0).await;
    assert_eq!(invoice["status"], "PENDING");
    assert_eq!(invoice["type"], "OTHER");
    let id = invoice["id"].as_str().unwrap();

    let response = app
        .put(&format!("/fees/{}/pay", id), Some(&parent), json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let paid: Value = response.json().await.unwrap();
    assert_eq!(paid["status"], "PROCESSING");
    assert_eq!(paid["paymentDate"], "2024-06-15");
    assert!(paid["transactionId"].as_str().unwrap().starts_with("TXN"));

    // Paying again while awaiting approval is refused.
    let response = app
        .put(&format!("/fees/{}/pay", id), Some(&parent), json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    let response = app
        .put(
            &format!("/fees/{}/status", id),
            Some(&admin),
            json!({ "status": "PAID" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let approved: Value = response.json().await.unwrap();
    assert_eq!(approved["status"], "PAID");
    assert_eq!(approved["transactionId"], paid["transactionId"]);
}

#[tokio::test]
async fn stored_plan_invoice_cannot_be_paid_after_the_annual_fee() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.seed_batch("Nursery", 15000).await;
    let (student, parent) = app.seed_family("STUD100005", "Nursery").await;

    let response = app
        .post(
            "/fees",
            Some(&admin),
            json!({
                "studentId": student.id,
                "title": "Tuition Fee - May 2024",
                "amount": 1250.0,
                "dueDate": "2024-05-10",
                "type": "MONTHLY",
                "period": "MAY"
            }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let may: Value = response.json().await.unwrap();
    let may_id = may["id"].as_str().unwrap();

    let response = app
        .post(
            &format!("/students/{}/fee-plan/pay", student.id),
            Some(&parent),
            json!({ "period": "ANNUAL" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .put(&format!("/fees/{}/pay", may_id), Some(&parent), json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Full session paid via Annual Plan.");

    let stored = app.store.fees.get(may_id).await.unwrap().unwrap();
    assert_eq!(stored.status, school_service::models::FeeStatus::Pending);
}

#[tokio::test]
async fn manual_override_stamps_a_manual_reference() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (student, _) = app.seed_family("STUD100002", "Nursery").await;
    let invoice = create_invoice(&app, &admin, &student.id, 500.0).await;
    let id = invoice["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/fees/{}/status", id),
            Some(&admin),
            json!({ "status": "PAID" }),
        )
        .send()
        .await
        .unwrap();
    let paid: Value = response.json().await.unwrap();
    assert!(paid["transactionId"].as_str().unwrap().starts_with("MANUAL-"));

    let response = app
        .put(
            &format!("/fees/{}/status", id),
            Some(&admin),
            json!({ "status": "OVERDUE" }),
        )
        .send()
        .await
        .unwrap();
    let reopened: Value = response.json().await.unwrap();
    assert_eq!(reopened["status"], "OVERDUE");
    assert!(reopened.get("transactionId").is_none());
    assert!(reopened.get("paymentDate").is_none());
}

#[tokio::test]
async fn parents_only_see_and_pay_their_own_invoices() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (student, _) = app.seed_family("STUD100003", "Nursery").await;
    let (_, stranger) = app.seed_family("STUD100004", "Nursery").await;
    let invoice = create_invoice(&app, &admin, &student.id, 500.0).await;
    let id = invoice["id"].as_str().unwrap();

    let response = app
        .get(&format!("/fees/student/{}", student.id), Some(&stranger))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .put(&format!("/fees/{}/pay", id), Some(&stranger), json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app.get("/fees", Some(&stranger)).send().await.unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn invoice_validation() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (student, _) = app.seed_family("STUD100005", "Nursery").await;

    let response = app
        .post(
            "/fees",
            Some(&admin),
            json!({
                "studentId": student.id,
                "title": "Refund?",
                "amount": -10,
                "dueDate": "2024-06-30"
            }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    let response = app
        .post(
            "/fees",
            Some(&admin),
            json!({
                "studentId": "STUD999999",
                "title": "Books",
                "amount": 10,
                "dueDate": "2024-06-30"
            }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn admin_deletes_invoice() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (student, _) = app.seed_family("STUD100006", "Nursery").await;
    let invoice = create_invoice(&app, &admin, &student.id, 500.0).await;
    let id = invoice["id"].as_str().unwrap();

    let response = app
        .delete(&format!("/fees/{}", id), Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .delete(&format!("/fees/{}", id), Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let fees: Value = app
        .get(&format!("/fees/student/{}", student.id), Some(&admin))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(fees.as_array().unwrap().is_empty());
}
