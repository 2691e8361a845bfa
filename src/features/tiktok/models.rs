use serde_json::Value;

use crate::error::AppError;

use super::extract::{self, ACCESS_TOKEN, OPEN_ID, REFRESH_TOKEN, UPLOAD_URL, VIDEO_ID};

/// 授权码交换得到的凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub open_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl TokenGrant {
    /// 从 token 响应中提取凭据；缺少 access_token 或 open_id 时返回 `IncompleteCredential`。
    pub fn from_response(body: &Value) -> Result<Self, AppError> {
        let access_token = extract::extract_str(body, ACCESS_TOKEN);
        let open_id = extract::extract_str(body, OPEN_ID);
        match (access_token, open_id) {
            (Some(access_token), Some(open_id)) => Ok(Self {
                open_id,
                access_token,
                refresh_token: extract::extract_str(body, REFRESH_TOKEN),
            }),
            _ => Err(AppError::IncompleteCredential { resp: body.clone() }),
        }
    }
}

/// upload/init 返回的上传会话
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub upload_url: String,
    pub video_id: Option<Value>,
}

impl UploadSession {
    /// 缺少 `upload_url` 时返回 `InitFailed`，并带上原始响应。
    pub fn from_response(body: Value) -> Result<Self, AppError> {
        let Some(upload_url) = extract::extract_str(&body, UPLOAD_URL) else {
            return Err(AppError::InitFailed { resp: body });
        };
        Ok(Self {
            upload_url,
            video_id: extract::extract_value(&body, VIDEO_ID),
        })
    }
}
