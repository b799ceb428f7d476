//! API integration tests
//!
//! These run against a live server with a seeded admin account.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@atrium.local",
            "password": "admin-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_register_and_login() {
    let client = Client::new();

    let email = format!("user-{}@example.org", uuid::Uuid::new_v4());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "a-strong-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "a-strong-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@atrium.local",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_invalid_book_id_is_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/books/not-a-uuid", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Create a single-copy book
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Borrow Cycle Test",
            "author": "Test Author",
            "isbn": "9783161484100",
            "published_year": 2001,
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.unwrap();
    let book_id = book["id"].as_str().unwrap().to_string();

    // Create a member
    let response = client
        .post(format!("{}/members", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Cycle",
            "last_name": "Tester",
            "email": format!("cycle-{}@example.org", uuid::Uuid::new_v4()),
            "phone": "15551230000"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let member: Value = response.json().await.unwrap();
    let member_id = member["id"].as_str().unwrap().to_string();

    // Borrow
    let response = client
        .post(format!("{}/members/{}/borrow/{}", BASE_URL, member_id, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available_copies"], 0);

    // Second borrow of the same pair is a conflict
    let response = client
        .post(format!("{}/members/{}/borrow/{}", BASE_URL, member_id, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Return
    let response = client
        .post(format!("{}/members/{}/return/{}", BASE_URL, member_id, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["available_copies"], 1);

    // Second return fails
    let response = client
        .post(format!("{}/members/{}/return/{}", BASE_URL, member_id, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_application_is_rejected() {
    let client = Client::new();

    // Two fresh accounts: an owner and an applicant
    let owner_email = format!("owner-{}@example.org", uuid::Uuid::new_v4());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Owner",
            "email": owner_email,
            "password": "a-strong-password"
        }))
        .send()
        .await
        .unwrap();
    let owner: Value = response.json().await.unwrap();
    let owner_token = owner["token"].as_str().unwrap().to_string();

    let applicant_email = format!("applicant-{}@example.org", uuid::Uuid::new_v4());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Applicant",
            "email": applicant_email,
            "password": "a-strong-password"
        }))
        .send()
        .await
        .unwrap();
    let applicant: Value = response.json().await.unwrap();
    let applicant_token = applicant["token"].as_str().unwrap().to_string();

    // Owner creates a project
    let response = client
        .post(format!("{}/projects", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner_token))
        .json(&json!({
            "title": "Dup Application Test",
            "description": "Testing uniqueness",
            "category": "other"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let project: Value = response.json().await.unwrap();
    let project_id = project["id"].as_str().unwrap().to_string();

    // First application succeeds
    let response = client
        .post(format!("{}/applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", applicant_token))
        .json(&json!({
            "project_id": project_id,
            "cover_letter": "Let me in",
            "proposed_role": "developer"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Second application for the same pair is a conflict
    let response = client
        .post(format!("{}/applications", BASE_URL))
        .header("Authorization", format!("Bearer {}", applicant_token))
        .json(&json!({
            "project_id": project_id,
            "cover_letter": "Let me in again",
            "proposed_role": "designer"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}
