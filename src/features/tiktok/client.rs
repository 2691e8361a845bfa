use reqwest::StatusCode;
use serde_json::{Value, json};
use url::Url;

use crate::config::{ProviderConfig, TIKTOK_SCOPE, TikTokConfig};
use crate::error::AppError;
use crate::http::build_provider_client;

use super::models::{TokenGrant, UploadSession};

/// TikTok 开放平台客户端
///
/// 不做重试；出站请求超时由 `ProviderConfig` 决定。
#[derive(Debug, Clone)]
pub struct TikTokClient {
    http: reqwest::Client,
    cfg: TikTokConfig,
}

impl TikTokClient {
    pub fn new(cfg: TikTokConfig, provider: &ProviderConfig) -> Result<Self, AppError> {
        let http = build_provider_client(provider)
            .map_err(|e| AppError::Internal(format!("初始化 HTTP Client 失败: {e}")))?;
        Ok(Self { http, cfg })
    }

    /// 构造授权页 URL（不含 state 参数）。
    pub fn authorize_url(&self) -> Result<String, AppError> {
        if !self.cfg.is_login_configured() {
            return Err(AppError::ConfigMissing);
        }
        let mut url = Url::parse(&self.cfg.authorize_url)
            .map_err(|e| AppError::Internal(format!("authorize_url 无效: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_key", &self.cfg.client_key)
            .append_pair("response_type", "code")
            .append_pair("scope", TIKTOK_SCOPE)
            .append_pair("redirect_uri", &self.cfg.redirect_uri);
        Ok(url.into())
    }

    /// 用授权码换取 access_token / open_id。
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AppError> {
        let form = [
            ("client_key", self.cfg.client_key.as_str()),
            ("client_secret", self.cfg.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.cfg.redirect_uri.as_str()),
        ];

        let resp = self
            .http
            .post(self.cfg.token_endpoint())
            .form(&form)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%status, error = %e, "token 响应不是 JSON");
            AppError::InvalidProviderResponse { raw: text.clone() }
        })?;

        let grant = TokenGrant::from_response(&body)?;
        tracing::debug!(open_id = %grant.open_id, %status, "token 交换成功");
        Ok(grant)
    }

    /// 第一步：申请上传会话。
    pub async fn init_upload(&self, access_token: &str) -> Result<UploadSession, AppError> {
        let resp = self
            .http
            .post(self.cfg.upload_init_endpoint())
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        // 非 JSON 的响应同样视为缺少 upload_url，原文回显便于排查
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        let session = UploadSession::from_response(body)?;
        tracing::debug!(%status, upload_url = %session.upload_url, "upload/init 完成");
        Ok(session)
    }

    /// 第二步：把视频字节整体 PUT 到 `upload_url`。
    pub async fn upload_binary(&self, upload_url: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let size = bytes.len();
        let resp = self.http.put(upload_url).body(bytes).send().await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body 读取失败>".to_string());
            return Err(AppError::UploadFailed {
                status_code: status.as_u16(),
                text,
            });
        }
        tracing::debug!(%status, size, "视频上传完成");
        Ok(())
    }

    /// 第三步：发布。平台的返回原样交给调用方，不解释其中的业务结果。
    pub async fn create_post(
        &self,
        access_token: &str,
        video_id: Option<Value>,
        caption: &str,
    ) -> Result<Value, AppError> {
        let payload = json!({
            "video_id": video_id.unwrap_or(Value::Null),
            "text": caption,
        });
        let resp = self
            .http
            .post(self.cfg.create_endpoint())
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            AppError::Unexpected(format!("create 响应不是 JSON (HTTP {status}): {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(cfg: TikTokConfig) -> TikTokClient {
        TikTokClient::new(cfg, &ProviderConfig::default()).expect("client")
    }

    fn configured() -> TikTokConfig {
        TikTokConfig {
            client_key: "ck_123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
            ..TikTokConfig::default()
        }
    }

    #[test]
    fn authorize_url_requires_client_key_and_redirect_uri() {
        let err = client_with(TikTokConfig::default())
            .authorize_url()
            .expect_err("unconfigured");
        assert!(matches!(err, AppError::ConfigMissing));

        let only_key = TikTokConfig {
            client_key: "ck".to_string(),
            ..TikTokConfig::default()
        };
        assert!(matches!(
            client_with(only_key).authorize_url(),
            Err(AppError::ConfigMissing)
        ));
    }

    #[test]
    fn authorize_url_carries_client_key_and_fixed_scope() {
        let raw = client_with(configured()).authorize_url().expect("url");
        let url = Url::parse(&raw).expect("parse");

        assert_eq!(url.host_str(), Some("www.tiktok.com"));
        assert_eq!(url.path(), "/v2/auth/authorize/");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| {
            pairs
                .iter()
                .filter(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(get("client_key"), vec!["ck_123"]);
        assert_eq!(get("response_type"), vec!["code"]);
        assert_eq!(get("redirect_uri"), vec!["https://example.com/callback"]);
        let scope = get("scope");
        assert_eq!(scope.len(), 1);
        assert_eq!(
            scope[0].split(',').collect::<Vec<_>>(),
            vec!["user.info.basic", "video.upload", "video.publish"]
        );
        assert!(get("state").is_empty());
    }

    #[tokio::test]
    async fn exchange_code_posts_form_and_parses_nested_shape() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/oauth/token/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("client_key".into(), "ck_123".into()),
                mockito::Matcher::UrlEncoded("client_secret".into(), "secret".into()),
                mockito::Matcher::UrlEncoded("code".into(), "abc".into()),
                mockito::Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                mockito::Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "https://example.com/callback".into(),
                ),
            ]))
            .with_status(200)
            .with_body(r#"{"data":{"access_token":"at","open_id":"u1","refresh_token":"rt"}}"#)
            .create_async()
            .await;

        let client = client_with(TikTokConfig {
            api_base_url: format!("{}/v2", server.url()),
            ..configured()
        });
        let grant = client.exchange_code("abc").await.expect("grant");
        assert_eq!(
            grant,
            TokenGrant {
                open_id: "u1".to_string(),
                access_token: "at".to_string(),
                refresh_token: Some("rt".to_string()),
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exchange_code_non_json_is_invalid_provider_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/oauth/token/")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let client = client_with(TikTokConfig {
            api_base_url: format!("{}/v2", server.url()),
            ..configured()
        });
        match client.exchange_code("abc").await {
            Err(AppError::InvalidProviderResponse { raw }) => {
                assert_eq!(raw, "<html>bad gateway</html>");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_binary_accepts_only_200_and_201() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("PUT", "/ok")
            .match_body("0123456789")
            .with_status(201)
            .create_async()
            .await;
        let _bad = server
            .mock("PUT", "/bad")
            .with_status(204)
            .with_body("")
            .create_async()
            .await;

        let client = client_with(configured());
        client
            .upload_binary(&format!("{}/ok", server.url()), b"0123456789".to_vec())
            .await
            .expect("201 accepted");

        match client
            .upload_binary(&format!("{}/bad", server.url()), b"x".to_vec())
            .await
        {
            Err(AppError::UploadFailed { status_code, .. }) => assert_eq!(status_code, 204),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
