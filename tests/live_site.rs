mod support;

use std::fs;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use linksly::domain::site::SiteMetadata;
use regex::Regex;
use tower::ServiceExt;

use support::{body_string, live_router};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn subscribe(body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/subscribe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn every_content_route_renders_site_title() {
    let dir = tempfile::tempdir().expect("tempdir");
    let title = SiteMetadata::default().title;

    for uri in ["/", "/privacy", "/terms", "/support"] {
        let response = live_router(&dir.path().join("subscribers.txt"))
            .oneshot(get(uri))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "{uri}: {content_type}");

        let html = body_string(response).await;
        assert!(html.contains(&title), "{uri} is missing the site title");
        assert!(html.contains(r#"href="/static/css/style.css""#), "{uri}");
    }
}

#[tokio::test]
async fn live_links_point_at_routes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = live_router(&dir.path().join("subscribers.txt"))
        .oneshot(get("/"))
        .await
        .expect("response");

    let html = body_string(response).await;
    assert!(html.contains(r#"href="/privacy""#));
    assert!(html.contains(r#"href="/terms""#));
    assert!(!html.contains(".html\""));
}

#[tokio::test]
async fn unknown_route_renders_not_found_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = live_router(&dir.path().join("subscribers.txt"))
        .oneshot(get("/does-not-exist"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_string(response).await;
    assert!(html.contains("Page not found"));
}

#[tokio::test]
async fn health_check_has_no_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = live_router(&dir.path().join("subscribers.txt"))
        .oneshot(get("/_health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn static_assets_are_served_with_mime_type() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = live_router(&dir.path().join("subscribers.txt"))
        .oneshot(get("/static/css/style.css"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/css")
    );
}

#[tokio::test]
async fn missing_asset_and_traversal_are_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let router = live_router(&dir.path().join("subscribers.txt"));

    for uri in ["/static/css/missing.css", "/static/../Cargo.toml"] {
        let response = router.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn subscribe_appends_one_line_per_signup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("subscribers.txt");
    let router = live_router(&log);

    let response = router
        .clone()
        .oneshot(subscribe(r#"{"email": "a@example.com"}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    insta::assert_snapshot!(body, @r#"{"success":true,"message":"Thanks for subscribing!"}"#);

    let response = router
        .clone()
        .oneshot(subscribe(r#"{"email": "  b@example.com  "}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(subscribe(r#"{"email": "   "}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let contents = fs::read_to_string(&log).expect("log written");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(contents.ends_with('\n'));

    let line = Regex::new(r"^\d{4}-\d{2}-\d{2}T[^,]+,(?P<email>[^,]+)$").expect("regex");
    let emails: Vec<&str> = lines
        .iter()
        .map(|entry| {
            line.captures(entry)
                .and_then(|captures| captures.name("email"))
                .map(|email| email.as_str())
                .expect("well-formed line")
        })
        .collect();
    assert_eq!(emails, vec!["a@example.com", "  b@example.com  ", "   "]);
}

#[tokio::test]
async fn subscribe_without_email_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("subscribers.txt");
    let router = live_router(&log);

    for body in [r#"{}"#, r#"{"email": ""}"#, r#"{"email": null}"#] {
        let response = router.clone().oneshot(subscribe(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let payload = body_string(response).await;
        assert_eq!(payload, r#"{"error":"Email required"}"#, "{body}");
    }

    assert!(!log.exists(), "rejected signups must not touch the log");
}

#[tokio::test]
async fn subscribe_with_line_break_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("subscribers.txt");

    let response = live_router(&log)
        .oneshot(subscribe(r#"{"email": "a@example.com\nb@example.com"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!log.exists());
}

#[tokio::test]
async fn subscribe_with_malformed_json_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("subscribers.txt");

    let response = live_router(&log)
        .oneshot(subscribe("not json"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_string(response).await;
    insta::assert_snapshot!(payload, @r#"{"error":"Invalid JSON body"}"#);
    assert!(!log.exists());
}

#[tokio::test]
async fn subscribe_rejects_get() {
    let dir = tempfile::tempdir().expect("tempdir");
    let response = live_router(&dir.path().join("subscribers.txt"))
        .oneshot(get("/api/subscribe"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
