//! Integration tests for the PMO backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::db::{init_database, seed, MemberStore, Repository};
use crate::members::MemberService;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::build(false).await
    }

    async fn seeded() -> Self {
        Self::build(true).await
    }

    async fn build(with_seed: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path, 5).await.expect("Failed to init DB");
        if with_seed {
            seed::seed_if_empty(&pool).await.expect("Failed to seed DB");
        }

        let state = AppState {
            repo: Arc::new(Repository::new(pool.clone())),
            members: Arc::new(MemberService::new(MemberStore::new(pool))),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "PMO Suite Server is running!");
}

#[tokio::test]
async fn test_member_lifecycle() {
    let fixture = TestFixture::new().await;

    // Create member
    let create_resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({
            "id": "m1",
            "name": "Kim",
            "position": "Senior",
            "join_date": "2026-01-27",
            "skills": ["Go", "SQL"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 201);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["success"], true);
    assert_eq!(create_body["data"]["deleted"], false);
    assert_eq!(create_body["data"]["skills"], json!(["Go", "SQL"]));

    // Duplicate create while active
    let conflict_resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "id": "m1", "name": "Someone Else" }))
        .send()
        .await
        .unwrap();

    assert_eq!(conflict_resp.status(), 409);
    let conflict_body: Value = conflict_resp.json().await.unwrap();
    assert_eq!(conflict_body["success"], false);
    assert_eq!(conflict_body["error"]["code"], "CONFLICT");

    let get_body: Value = fixture
        .client
        .get(fixture.url("/api/members/m1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["name"], "Kim");

    // Soft delete
    let delete_resp = fixture
        .client
        .delete(fixture.url("/api/members/m1"))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 204);

    let gone_resp = fixture
        .client
        .get(fixture.url("/api/members/m1"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone_resp.status(), 404);

    let kept_body: Value = fixture
        .client
        .get(fixture.url("/api/members/m1?include_deleted=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(kept_body["data"]["deleted"], true);

    // Revive through create
    let revive_resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "id": "m1", "name": "Kim2", "skills": ["Rust"] }))
        .send()
        .await
        .unwrap();

    assert_eq!(revive_resp.status(), 201);
    let revive_body: Value = revive_resp.json().await.unwrap();
    assert_eq!(revive_body["data"]["name"], "Kim2");
    assert_eq!(revive_body["data"]["skills"], json!(["Rust"]));
    assert_eq!(revive_body["data"]["deleted"], false);
}

#[tokio::test]
async fn test_member_update() {
    let fixture = TestFixture::seeded().await;

    let update_resp = fixture
        .client
        .put(fixture.url("/api/members/m1"))
        .json(&json!({ "note": "Team lead from March" }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["note"], "Team lead from March");
    assert_eq!(update_body["data"]["skills"], json!(["React", "Node", "AWS"]));

    let clear_body: Value = fixture
        .client
        .put(fixture.url("/api/members/m1"))
        .json(&json!({ "skills": [] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clear_body["data"]["skills"], json!([]));

    let missing_resp = fixture
        .client
        .put(fixture.url("/api/members/missing"))
        .json(&json!({ "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_resp.status(), 404);
    let missing_body: Value = missing_resp.json().await.unwrap();
    assert_eq!(missing_body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_member_validation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "id": "  ", "name": "Kim" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "name": "Kim" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("id"));

    let resp = fixture
        .client
        .put(fixture.url("/api/projects/p1"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_member_update_with_null_clears_field() {
    let fixture = TestFixture::new().await;

    fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "id": "m9", "name": "Kim", "note": "x" }))
        .send()
        .await
        .unwrap();

    let body: Value = fixture
        .client
        .put(fixture.url("/api/members/m9"))
        .json(&json!({ "note": null }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["note"], Value::Null);
    assert!(body["data"].get("join_date").is_some());
    assert_eq!(body["data"]["name"], "Kim");
}

#[tokio::test]
async fn test_member_list_excludes_deleted() {
    let fixture = TestFixture::seeded().await;

    fixture
        .client
        .delete(fixture.url("/api/members/m2"))
        .send()
        .await
        .unwrap();

    let active: Value = fixture
        .client
        .get(fixture.url("/api/members"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = active["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m1", "m3", "m4", "m5"]);

    let all: Value = fixture
        .client
        .get(fixture.url("/api/members?include_deleted=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_project_crud() {
    let fixture = TestFixture::seeded().await;

    // List seeded projects
    let list_body: Value = fixture
        .client
        .get(fixture.url("/api/projects"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!list_body["data"].as_array().unwrap().is_empty());

    // Create project
    let create_resp = fixture
        .client
        .post(fixture.url("/api/projects"))
        .json(&json!({
            "name": "Test Project",
            "code": "TEST-2026",
            "client": "Test Client",
            "type": "External",
            "order_amount": 100000,
            "start_date": "2026-01-01",
            "end_date": "2026-12-31",
            "status": "Planning"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 201);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["data"]["name"], "Test Project");
    let project_id = create_body["data"]["id"].as_str().unwrap().to_string();

    // Get seeded project
    let get_body: Value = fixture
        .client
        .get(fixture.url("/api/projects/p1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["id"], "p1");
    assert_eq!(get_body["data"]["type"], "External");

    // Update project
    let update_resp = fixture
        .client
        .put(fixture.url("/api/projects/p1"))
        .json(&json!({ "name": "Updated Project Name", "status": "On Hold" }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["name"], "Updated Project Name");
    assert_eq!(update_body["data"]["status"], "On Hold");

    // Delete project
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 204);

    // Verify deleted
    let get_deleted_resp = fixture
        .client
        .get(fixture.url(&format!("/api/projects/{}", project_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(get_deleted_resp.status(), 404);
}

#[tokio::test]
async fn test_assignment_crud() {
    let fixture = TestFixture::seeded().await;

    let create_resp = fixture
        .client
        .post(fixture.url("/api/assignments"))
        .json(&json!({
            "project_id": "p2",
            "member_id": "m3",
            "member_name": "Park Jun-ho",
            "role": "DEV",
            "start_date": "2026-03-01",
            "end_date": "2026-04-30",
            "input_ratio": 0.5,
            "monthly_weights": { "2026-03": 0.5, "2026-04": 0.5 }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 201);
    let create_body: Value = create_resp.json().await.unwrap();
    let assignment_id = create_body["data"]["id"].as_str().unwrap().to_string();

    let get_body: Value = fixture
        .client
        .get(fixture.url(&format!("/api/assignments/{}", assignment_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["role"], "DEV");
    assert_eq!(get_body["data"]["monthly_weights"]["2026-04"], 0.5);

    let update_body: Value = fixture
        .client
        .put(fixture.url(&format!("/api/assignments/{}", assignment_id)))
        .json(&json!({ "input_ratio": 1.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(update_body["data"]["input_ratio"], 1.0);
    assert_eq!(update_body["data"]["role"], "DEV");

    let list_body: Value = fixture
        .client
        .get(fixture.url("/api/assignments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 4);

    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/assignments/{}", assignment_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 204);

    let missing_resp = fixture
        .client
        .get(fixture.url(&format!("/api/assignments/{}", assignment_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_resp.status(), 404);
}

#[tokio::test]
async fn test_position_levels() {
    let fixture = TestFixture::seeded().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/position-levels"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"],
        json!(["Junior", "Intermediate", "Senior", "Lead", "Principal"])
    );
}
