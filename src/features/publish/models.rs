use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// `/postar` 的表单参数，同时接受 urlencoded 与 multipart 两种编码。
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct PublishForm {
    /// 视频文案，缺省为空串
    #[serde(default)]
    pub caption: String,
    /// `/upload_video` 返回的 path
    #[serde(default)]
    pub video_path: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PublishResponse {
    #[schema(example = true)]
    pub ok: bool,
    /// create 端点的原始响应
    #[schema(value_type = Object)]
    pub result: Value,
}

#[axum::async_trait]
impl<S> FromRequest<S> for PublishForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type {
            // 无请求体时按全部缺省处理，由后续校验给出具体错误
            None => Ok(Self::default()),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                let mut form = Self::default();
                while let Some(field) = multipart
                    .next_field()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?
                {
                    let name = field.name().map(str::to_string);
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?;
                    match name.as_deref() {
                        Some("caption") => form.caption = text,
                        Some("video_path") => form.video_path = Some(text),
                        _ => {}
                    }
                }
                Ok(form)
            }
            Some(_) => {
                let Form(form) = Form::<Self>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                Ok(form)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(req: Request) -> Result<PublishForm, AppError> {
        PublishForm::from_request(req, &()).await
    }

    #[tokio::test]
    async fn urlencoded_body_is_parsed_with_default_caption() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/postar")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("video_path=videos%2Fa.mp4"))
            .expect("request");
        let form = extract(req).await.expect("form");
        assert_eq!(form.caption, "");
        assert_eq!(form.video_path.as_deref(), Some("videos/a.mp4"));
    }

    #[tokio::test]
    async fn multipart_body_is_parsed() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"video_path\"\r\n\r\nvideos/x.mp4\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/postar")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request");
        let form = extract(req).await.expect("form");
        assert_eq!(form.caption, "hello");
        assert_eq!(form.video_path.as_deref(), Some("videos/x.mp4"));
    }

    #[tokio::test]
    async fn missing_content_type_yields_empty_form() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/postar")
            .body(Body::empty())
            .expect("request");
        let form = extract(req).await.expect("form");
        assert!(form.video_path.is_none());
    }
}
