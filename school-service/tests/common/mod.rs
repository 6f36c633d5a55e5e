#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use school_service::config::SchoolConfig;
use school_service::models::{Batch, Role, Student, User};
use school_service::services::{FixedClock, Store};
use school_service::startup::Application;
use school_service::utils::{hash_password, Password};

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "password123";
pub const PARENT_PASSWORD: &str = "parent-pass";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
    /// Same store the server uses, for arranging fixtures directly.
    pub store: Store,
    pub today: NaiveDate,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl TestApp {
    /// Server pinned to 15 June 2024, inside the 2024-25 session.
    pub async fn spawn() -> Self {
        Self::spawn_on(date(2024, 6, 15)).await
    }

    pub async fn spawn_on(today: NaiveDate) -> Self {
        let app = Application::build_with_clock(
            SchoolConfig::for_tests(),
            Arc::new(FixedClock::on(today)),
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let store = app.state().store.clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            store,
            today,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authed(self.client.get(self.url(path)), token)
    }

    pub fn post(&self, path: &str, token: Option<&str>, body: Value) -> RequestBuilder {
        authed(self.client.post(self.url(path)), token).json(&body)
    }

    pub fn put(&self, path: &str, token: Option<&str>, body: Value) -> RequestBuilder {
        authed(self.client.put(self.url(path)), token).json(&body)
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        authed(self.client.delete(self.url(path)), token)
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post(
            "/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .send()
        .await
        .expect("Failed to execute request")
    }

    pub async fn token_for(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), 200, "login failed for {}", email);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let hash = hash_password(&Password::new(password)).unwrap();
        let user = User::new(name.to_string(), email, hash, role);
        self.store.users.insert(&user).await.unwrap();
        user
    }

    pub async fn seed_batch(&self, name: &str, annual_fee: i64) -> Batch {
        let batch = Batch {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            capacity: 20,
            fee_amount: Decimal::from(annual_fee),
            description: None,
            age_group: None,
        };
        self.store.batches.insert(&batch).await.unwrap();
        batch
    }

    /// A parent with one child in `batch`. Returns the student and a parent token.
    pub async fn seed_family(&self, student_id: &str, batch: &str) -> (Student, String) {
        let email = format!("parent-{}@test.com", student_id.to_lowercase());
        let parent = self
            .seed_user("Parent", &email, PARENT_PASSWORD, Role::Parent)
            .await;
        let student = Student {
            id: student_id.to_string(),
            name: format!("Child {}", student_id),
            batch: batch.to_string(),
            parent_id: parent.id.clone(),
            enrollment_date: date(2024, 4, 1),
            father_name: None,
            mother_name: None,
            contact_number: None,
            address: None,
            profile_picture: None,
            fee_plan: None,
        };
        self.store.students.insert(&student).await.unwrap();
        let token = self.token_for(&email, PARENT_PASSWORD).await;
        (student, token)
    }
}

fn authed(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}
