//! HTTP route tests: page, assets and JSON API.

use crate::common::{assert_json_contains, TestHarness};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use pregnancy_dashboard::agenda::NewAgendaItem;
use pregnancy_dashboard::dashboard::{build_router, AVATAR_FILE};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(harness: &TestHarness) -> Router {
    build_router(harness.state.clone())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn item(y: i32, m: u32, d: u32, h: u32, description: &str) -> NewAgendaItem {
    NewAgendaItem {
        datetime: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap(),
        all_day: false,
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new("production").await;
    let response = send(app(&harness), Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_index_renders_progress_and_dates() {
    let harness = TestHarness::new("production").await;
    let response = send(app(&harness), Method::GET, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<h1>Jantje</h1>"));
    assert!(html.contains(r#"<span class="number">14</span> weeks"#));
    assert!(html.contains(r#"<span class="number">2</span> days"#));
    assert!(html.contains("27 January 2022"));
    assert!(html.contains("Trimester 2"));
    assert!(html.contains("First echo"));
    assert!(html.contains("Nothing planned."));
}

#[tokio::test]
async fn test_index_lists_only_upcoming_items() {
    let harness = TestHarness::new("production").await;
    harness
        .agenda()
        .add_item(&item(2021, 7, 1, 9, "Already happened"))
        .await
        .unwrap();
    harness
        .agenda()
        .add_item(&item(2021, 8, 5, 10, "Second echo"))
        .await
        .unwrap();

    let html = body_text(send(app(&harness), Method::GET, "/", None).await).await;
    assert!(html.contains("Second echo"));
    assert!(html.contains("2021-08-05 10:00"));
    assert!(!html.contains("Already happened"));
    assert!(!html.contains("Nothing planned."));
}

#[tokio::test]
async fn test_index_escapes_agenda_descriptions() {
    let harness = TestHarness::new("production").await;
    harness
        .agenda()
        .add_item(&item(2021, 8, 5, 10, "<script>alert(1)</script>"))
        .await
        .unwrap();

    let html = body_text(send(app(&harness), Method::GET, "/", None).await).await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)"));
}

#[tokio::test]
async fn test_static_assets_have_content_types() {
    let harness = TestHarness::new("production").await;

    let css = send(app(&harness), Method::GET, "/style.css", None).await;
    assert_eq!(css.status(), StatusCode::OK);
    assert!(css.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/css"));

    let js = send(app(&harness), Method::GET, "/script.js", None).await;
    assert_eq!(js.status(), StatusCode::OK);
    assert!(js.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
    assert!(body_text(js).await.contains("dataset.percentage"));
}

#[tokio::test]
async fn test_avatar_missing_then_served() {
    let harness = TestHarness::new("production").await;

    let missing = send(app(&harness), Method::GET, "/boss-baby.png", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_json_contains(
        &body_json(missing).await,
        &json!({"status": "error", "error": {"type": "NotFound"}}),
    );

    let png = [0x89u8, b'P', b'N', b'G'];
    std::fs::write(harness.dir.path().join(AVATAR_FILE), png).unwrap();
    let found = send(app(&harness), Method::GET, "/boss-baby.png", None).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(found.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(found.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], &png);
}

#[tokio::test]
async fn test_pregnancy_api() {
    let harness = TestHarness::new("production").await;
    let response = send(app(&harness), Method::GET, "/api/pregnancy", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_json_contains(
        &body_json(response).await,
        &json!({
            "status": "ok",
            "pregnancy": {
                "name": "Jantje",
                "age": "14 weeks and 2 days",
                "weeks": 14,
                "days": 2,
                "age_in_days": 100,
                "trimester": 2,
                "due": "2022-01-27",
                "days_left": 180,
                "progress": {"trimester": 8, "pregnancy": 36}
            }
        }),
    );
}

#[tokio::test]
async fn test_agenda_create_get_list_delete() {
    let harness = TestHarness::new("production").await;

    let created = send(
        app(&harness),
        Method::POST,
        "/api/agenda",
        Some(json!({"datetime": "2021-08-05T10:00:00", "description": "  Second echo  "})),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let created = body_json(created).await;
    assert_json_contains(
        &created,
        &json!({"status": "ok", "item": {"all_day": false, "description": "Second echo"}}),
    );
    let id = created["item"]["id"].as_i64().unwrap();

    let fetched = send(app(&harness), Method::GET, &format!("/api/agenda/{id}"), None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_json_contains(
        &body_json(fetched).await,
        &json!({"item": {"id": id, "description": "Second echo"}}),
    );

    let listed = body_json(send(app(&harness), Method::GET, "/api/agenda", None).await).await;
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);

    let filtered = body_json(
        send(app(&harness), Method::GET, &format!("/api/agenda?id={id}"), None).await,
    )
    .await;
    assert_eq!(filtered["items"][0]["id"], id);

    let deleted = send(app(&harness), Method::DELETE, &format!("/api/agenda/{id}"), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_json_contains(&body_json(deleted).await, &json!({"deleted": id}));

    let gone = send(app(&harness), Method::DELETE, &format!("/api/agenda/{id}"), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_filter_not_valid() {
    let harness = TestHarness::new("production").await;

    let response = send(app(&harness), Method::GET, "/api/agenda?id=abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_json_contains(
        &body,
        &json!({"status": "error", "error": {"type": "FilterNotValid"}}),
    );
    assert!(body["error"]["message"].as_str().unwrap().contains("abc"));

    let by_path = send(app(&harness), Method::GET, "/api/agenda/abc", None).await;
    assert_eq!(by_path.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_agenda_rejects_empty_description() {
    let harness = TestHarness::new("production").await;
    let response = send(
        app(&harness),
        Method::POST,
        "/api/agenda",
        Some(json!({"datetime": "2021-08-05T10:00:00", "description": "   "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_contains(
        &body_json(response).await,
        &json!({"error": {"type": "InvalidPayload"}}),
    );
}

#[tokio::test]
async fn test_unknown_agenda_item_is_not_found() {
    let harness = TestHarness::new("production").await;
    let response = send(app(&harness), Method::GET, "/api/agenda/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pool_statistics() {
    let harness = TestHarness::new("production").await;
    let response = send(app(&harness), Method::GET, "/api/pool", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_json_contains(&body, &json!({"status": "ok", "pool": {"max_connections": 3}}));
    let pool = &body["pool"];
    assert_eq!(
        pool["pool_size"].as_u64().unwrap(),
        pool["checked_in"].as_u64().unwrap() + pool["checked_out"].as_u64().unwrap()
    );
}
