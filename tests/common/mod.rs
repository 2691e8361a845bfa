#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use tempfile::TempDir;
use tiktok_bridge::{
    AppConfig, AppState, build_app,
    config::{ProviderConfig, StorageConfig, TikTokConfig},
};

pub const BOUNDARY: &str = "----bridge-test-boundary";

/// 每个测试独立的临时目录 + 应用实例
pub struct TestEnv {
    pub dir: TempDir,
    pub config: AppConfig,
    pub state: AppState,
    pub app: Router,
}

pub fn test_config(dir: &TempDir, api_base_url: &str) -> AppConfig {
    AppConfig {
        tiktok: TikTokConfig {
            client_key: "ck_test".to_string(),
            client_secret: "cs_test".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
            api_base_url: api_base_url.to_string(),
            ..TikTokConfig::default()
        },
        storage: StorageConfig {
            file: dir.path().join("tokens.json").display().to_string(),
            videos_dir: dir.path().join("videos").display().to_string(),
        },
        provider: ProviderConfig { timeout_secs: 5 },
        ..AppConfig::default()
    }
}

pub async fn setup_with(config_fn: impl FnOnce(&TempDir) -> AppConfig) -> TestEnv {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_fn(&dir);
    let state = AppState::from_config(&config).await.expect("state");
    let app = build_app(state.clone(), &config);
    TestEnv {
        dir,
        config,
        state,
        app,
    }
}

pub async fn setup(api_base_url: &str) -> TestEnv {
    let base = api_base_url.to_string();
    setup_with(move |dir| test_config(dir, &base)).await
}

pub fn multipart_file(field: &str, filename: &str, content: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload_video")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_file("file", filename, content))
        .expect("build upload request")
}

pub fn publish_request(caption: &str, video_path: Option<&str>) -> Request<Body> {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("caption", caption);
    if let Some(p) = video_path {
        form.append_pair("video_path", p);
    }
    Request::builder()
        .method("POST")
        .uri("/postar")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.finish()))
        .expect("build publish request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build get request")
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

/// 任何出站 POST/PUT 都会被记录；配合 `.expect(0)` 断言“零出站调用”。
pub async fn forbid_all_calls(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();
    for method in ["GET", "POST", "PUT"] {
        mocks.push(
            server
                .mock(method, mockito::Matcher::Any)
                .expect(0)
                .create_async()
                .await,
        );
    }
    mocks
}
