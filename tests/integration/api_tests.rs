//! API integration tests
//!
//! These tests run against a live server with real store/identity
//! credentials. ID tokens are minted by the identity provider, so the admin
//! token is taken from the environment.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Admin ID token for authenticated requests
fn admin_token() -> String {
    std::env::var("VISIOTRAIN_TEST_TOKEN").expect("VISIOTRAIN_TEST_TOKEN not set")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_list_users() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users?pageSize=10", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_get_statistics() {
    let client = Client::new();

    let response = client
        .post(format!("{}/admin/statistics", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .json(&json!({
            "filters": {
                "includeClinic": false
            }
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"]["totalUsers"].is_number());
    assert!(body["data"]["ageStats"].is_array());
    assert!(body["data"]["gameStats"]["total"].is_array());
    assert!(body["data"]["playTimeStats"]["usersCount"].is_number());
    assert_eq!(body["filters"]["includeClinic"], false);
}

#[tokio::test]
#[ignore]
async fn test_statistics_leaderboards_are_bounded() {
    let client = Client::new();

    let response = client
        .post(format!("{}/admin/statistics", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .json(&json!({ "filters": {} }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for group in ["total", "binocular", "monocular"] {
        let games = body["data"]["gameStats"][group]
            .as_array()
            .expect("leaderboard missing");
        assert!(games.len() <= 10);
        let percentage_sum: f64 = games
            .iter()
            .map(|g| g["percentage"].as_f64().unwrap_or(0.0))
            .sum();
        assert!(percentage_sum <= 100.01);
    }
}

#[tokio::test]
#[ignore]
async fn test_list_distributors() {
    let client = Client::new();

    let response = client
        .get(format!("{}/distributors", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_distributor_rejects_foreign_domain() {
    let client = Client::new();

    let response = client
        .post(format!("{}/distributors", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .json(&json!({
            "type": "clinic",
            "name": "Test Clinic",
            "phone": "+380501234567",
            "city": "Kyiv",
            "login": "test@example.com",
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_list_promocodes() {
    let client = Client::new();

    let response = client
        .get(format!("{}/promocodes", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
    assert!(body["stats"]["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_find_missing_promocode() {
    let client = Client::new();

    let response = client
        .post(format!("{}/promocodes/find", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .json(&json!({ "code": "DOES-NOT-EXIST" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Promo code not found");
}
