mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shortifyme::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_shorten_success() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com/very/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(json["short_url"], format!("https://s.example.com/{code}"));
    assert_eq!(
        json["qr_code_url"],
        format!("https://quickchart.io/qr?text=https%3A%2F%2Fs.example.com%2F{code}&size=150")
    );
}

#[tokio::test]
async fn test_shorten_defaults_title() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com", "alias": "untitled" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let link = app.state.link_service.get_by_code("untitled").await.unwrap();
    assert_eq!(link.title, "API Link");
}

#[tokio::test]
async fn test_shorten_with_alias_and_title() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com", "title": "Launch", "alias": "launch" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["code"], "launch");

    let link = app.state.link_service.get_by_code("launch").await.unwrap();
    assert_eq!(link.title, "Launch");

    app.server
        .get("/launch")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_shorten_missing_url() {
    let app = common::test_app();

    for body in [json!({}), json!({ "url": "   " }), json!({ "title": "no url" })] {
        let response = app.server.post("/api/v1/shorten").json(&body).await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "invalid_input");
        assert_eq!(json["error"]["details"]["field"], "url");
    }
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_shorten_alias_taken() {
    let app = common::test_app();
    common::insert_link(&app.repo, 1, "taken", "https://first.example.com/");

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://second.example.com", "alias": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "duplicate_code");
    assert_eq!(body["error"]["details"], json!({ "code": "taken" }));
    assert_eq!(app.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_shorten_reserved_alias() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com", "alias": "health-check" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_needs_no_token() {
    let app = common::test_app();

    app.server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::CREATED);
}
