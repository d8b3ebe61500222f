use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use mockable::DefaultClock;
use serde_json::{json, Value};
use service::branch::repository::mock::MockBranchRepository;
use tower::ServiceExt;

use server::routes;
use server::state::ServerState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn build_app() -> (Router, Arc<MockBranchRepository>) {
    let repo = Arc::new(MockBranchRepository::default());
    let state = ServerState::new(repo.clone(), Arc::new(DefaultClock));
    (routes::build_router(state, cors()), repo)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn branch_body(state: &str) -> Value {
    json!({
        "emailAddress": "matriz@banco.ec",
        "name": "Matriz",
        "phoneNumber": "022000000",
        "state": state
    })
}

async fn create(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(app, "POST", "/api/v1/branches", Some(branch_body("ACTIVE"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(body["id"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_returns_201_with_view() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, body) = send(&app, "POST", "/api/v1/branches", Some(branch_body("  inactive "))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["state"], "INACTIVE");
    assert_eq!(body["emailAddress"], "matriz@banco.ec");
    assert_eq!(body["creationDate"], body["lastModifiedDate"]);
    assert_eq!(body["branchHolidays"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_with_bad_state_is_400_with_allowed_values() -> anyhow::Result<()> {
    let (app, repo) = build_app();
    let (status, body) = send(&app, "POST", "/api/v1/branches", Some(branch_body("CLOSED"))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Invalid state. Allowed: ACTIVE, INACTIVE");
    assert!(body["timestamp"].is_string());
    assert!(repo.is_empty());
    Ok(())
}

#[tokio::test]
async fn structural_errors_are_400() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let cases = [
        json!({"emailAddress": "nope", "name": "M", "phoneNumber": "1", "state": "ACTIVE"}),
        json!({"emailAddress": "a@b.ec", "name": "", "phoneNumber": "1", "state": "ACTIVE"}),
        json!({"emailAddress": "a@b.ec", "name": "M", "phoneNumber": " ", "state": "ACTIVE"}),
        json!({"emailAddress": "a@b.ec", "name": "M", "phoneNumber": "1"}),
        json!({"emailAddress": "a@b.ec", "name": "M", "phoneNumber": "1", "state": "ACTIVE",
               "branchHolidays": [{"date": "2025-13-01", "name": "bad"}]}),
    ];
    for body in cases {
        let (status, _) = send(&app, "POST", "/api/v1/branches", Some(body.clone())).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/branches")
        .header("content-type", "application/json")
        .body(Body::from("{oops"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_branch_is_404_everywhere() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let cases = [
        ("GET", "/api/v1/branches/nope", None),
        ("PUT", "/api/v1/branches/nope", Some(branch_body("ACTIVE"))),
        ("DELETE", "/api/v1/branches/nope", None),
        ("PATCH", "/api/v1/branches/nope/phone?phoneNumber=0999", None),
        ("POST", "/api/v1/branches/nope/holidays", Some(json!({"date": "2025-12-25", "name": "Christmas"}))),
        ("GET", "/api/v1/branches/nope/holidays", None),
        ("DELETE", "/api/v1/branches/nope/holidays/2025-12-25", None),
        ("GET", "/api/v1/branches/nope/holidays/check?date=2025-12-25", None),
    ];
    for (method, uri, body) in cases {
        let (status, json) = send(&app, method, uri, body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(json["message"], "Branch not found");
    }
    Ok(())
}

#[tokio::test]
async fn holiday_lifecycle() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let id = create(&app).await?;
    let base = format!("/api/v1/branches/{id}/holidays");

    // delete on empty calendar
    let (status, body) = send(&app, "DELETE", &format!("{base}/2025-12-25"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No holidays found for branch");

    let (status, body) = send(&app, "POST", &base, Some(json!({"date": "2025-12-25", "name": "Christmas"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branchHolidays"], json!([{"date": "2025-12-25", "name": "Christmas"}]));

    let (status, body) = send(&app, "POST", &base, Some(json!({"date": "2025-12-25", "name": "Navidad"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Holiday already exists");

    let (status, _) = send(&app, "POST", &base, Some(json!({"date": "2025-01-01", "name": " "}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, "GET", &base, None).await?;
    assert_eq!(listed, json!([{"date": "2025-12-25", "name": "Christmas"}]));

    let (_, yes) = send(&app, "GET", &format!("{base}/check?date=2025-12-25"), None).await?;
    assert_eq!(yes, json!(true));
    let (_, no) = send(&app, "GET", &format!("{base}/check?date=2025-12-24"), None).await?;
    assert_eq!(no, json!(false));
    let (status, _) = send(&app, "GET", &format!("{base}/check?date=tomorrow"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", &format!("{base}/2025-12-24"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Holiday not found for date: 2025-12-24");

    let (status, _) = send(&app, "DELETE", &format!("{base}/2025-12-25"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed) = send(&app, "GET", &base, None).await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn phone_patch_validates_and_updates() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let id = create(&app).await?;

    let (status, body) = send(&app, "PATCH", &format!("/api/v1/branches/{id}/phone?phoneNumber=%20"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Phone number is required");

    let (status, _) = send(&app, "PATCH", &format!("/api/v1/branches/{id}/phone"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, before) = send(&app, "GET", &format!("/api/v1/branches/{id}"), None).await?;
    assert_eq!(before["phoneNumber"], "022000000");

    let (status, body) = send(&app, "PATCH", &format!("/api/v1/branches/{id}/phone?phoneNumber=0999999999"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phoneNumber"], "0999999999");
    assert_eq!(body["name"], "Matriz");
    Ok(())
}

#[tokio::test]
async fn put_replaces_and_delete_removes() -> anyhow::Result<()> {
    let (app, repo) = build_app();
    let id = create(&app).await?;
    let uri = format!("/api/v1/branches/{id}");

    let body = json!({
        "emailAddress": "norte@banco.ec",
        "name": "Norte",
        "phoneNumber": "023000000",
        "state": "inactive",
        "branchHolidays": [{"date": "2025-08-10", "name": "Primer Grito"}]
    });
    let (status, updated) = send(&app, "PUT", &uri, Some(body)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["state"], "INACTIVE");
    assert_eq!(updated["branchHolidays"][0]["name"], "Primer Grito");

    let (_, all) = send(&app, "GET", "/api/v1/branches", None).await?;
    assert_eq!(all.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(repo.is_empty());
    Ok(())
}

#[tokio::test]
async fn repository_failure_is_500() -> anyhow::Result<()> {
    let (app, repo) = build_app();
    let id = create(&app).await?;
    repo.set_fail_writes(true);
    let (status, body) = send(&app, "PATCH", &format!("/api/v1/branches/{id}/phone?phoneNumber=1"), None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_branch_paths() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/branches/{id}/holidays/check"].is_object());
    Ok(())
}

#[tokio::test]
async fn delete_with_non_date_segment_is_400() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let id = create(&app).await?;
    for segment in ["check", "tomorrow"] {
        let (status, body) = send(&app, "DELETE", &format!("/api/v1/branches/{id}/holidays/{segment}"), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{segment}");
        assert_eq!(body["message"], format!("Invalid date '{segment}', expected YYYY-MM-DD"));
    }
    Ok(())
}
