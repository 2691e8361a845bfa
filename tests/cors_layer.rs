mod common;

use axum::{
    body::Body,
    http::{Request, header},
};
use tower::ServiceExt;

use common::{setup, setup_with, test_config};

#[tokio::test]
async fn default_config_allows_any_origin() {
    let env = setup("http://127.0.0.1:9/v2").await;

    let req = Request::builder()
        .method("GET")
        .uri("/status")
        .header(header::ORIGIN, "https://anywhere.example")
        .body(Body::empty())
        .expect("build request");
    let resp = env.app.clone().oneshot(req).await.expect("call app");

    let allow_origin = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("missing allow origin")
        .to_str()
        .expect("invalid allow origin");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn preflight_for_publish_is_answered() {
    let env = setup("http://127.0.0.1:9/v2").await;

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/postar")
        .header(header::ORIGIN, "https://anywhere.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("build request");
    let resp = env.app.clone().oneshot(req).await.expect("call app");

    assert!(resp.status().is_success());
    let allow_methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .expect("missing allow methods")
        .to_str()
        .expect("invalid allow methods");
    assert_eq!(allow_methods, "*");
}

#[tokio::test]
async fn restricted_origin_list_is_honoured() {
    let env = setup_with(|dir| {
        let mut cfg = test_config(dir, "http://127.0.0.1:9/v2");
        cfg.cors.allowed_origins = vec!["https://ops.example".to_string()];
        cfg
    })
    .await;

    let req = Request::builder()
        .uri("/status")
        .header(header::ORIGIN, "https://ops.example")
        .body(Body::empty())
        .expect("build request");
    let resp = env.app.clone().oneshot(req).await.expect("call app");
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://ops.example")
    );

    let req = Request::builder()
        .uri("/status")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .expect("build request");
    let resp = env.app.clone().oneshot(req).await.expect("call app");
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
