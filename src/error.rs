use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// 应用统一错误类型
///
/// 每个变体对应一种对外可区分的失败；`Unexpected` 仅用于发布流程中
/// 未被具名分类的异常，且在响应中带独立的 `code`。
#[derive(Error, Debug)]
pub enum AppError {
    /// client_key / redirect_uri 未配置
    #[error("CLIENT_KEY or REDIRECT_URI not set in env")]
    ConfigMissing,

    /// 回调缺少 code 参数
    #[error("missing code")]
    MissingCode,

    /// 请求参数校验错误
    #[error("{0}")]
    Validation(String),

    /// 平台返回的 token 响应不是 JSON
    #[error("invalid response from TikTok")]
    InvalidProviderResponse { raw: String },

    /// token 响应中缺少 access_token 或 open_id
    #[error("could not obtain access_token or open_id")]
    IncompleteCredential { resp: Value },

    /// 没有任何已连接账号
    #[error("no connected TikTok account")]
    NoConnectedAccount,

    /// 视频路径缺失或文件不存在
    #[error("video_path missing or file not found")]
    VideoNotFound,

    /// upload/init 未返回 upload_url
    #[error("init failed")]
    InitFailed { resp: Value },

    /// 二进制上传返回非 200/201
    #[error("upload failed")]
    UploadFailed { status_code: u16, text: String },

    /// 凭据文件内容不是合法 JSON
    #[error("token storage is corrupt: {0}")]
    StorageCorrupt(String),

    /// 出站请求失败（连接/超时等）
    #[error("上游请求失败: {0}")]
    Upstream(String),

    /// 发布流程中未分类的异常
    #[error("{0}")]
    Unexpected(String),

    /// 内部服务器错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一错误响应体
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 恒为 false
    #[schema(example = false)]
    pub ok: bool,

    /// 人类可读的错误信息
    #[schema(example = "no connected TikTok account")]
    pub error: String,

    /// 稳定的错误码，用于程序化处理
    #[schema(example = "NO_CONNECTED_ACCOUNT")]
    pub code: String,

    /// 请求追踪 ID
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// token 端点返回的原始文本（INVALID_PROVIDER_RESPONSE）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// 平台返回的原始 JSON（INCOMPLETE_CREDENTIAL / INIT_FAILED）
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub resp: Option<Value>,

    /// 上传端点返回的状态码（UPLOAD_FAILED）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// 上传端点返回的响应文本（UPLOAD_FAILED）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ConfigMissing
            | AppError::MissingCode
            | AppError::Validation(_)
            | AppError::NoConnectedAccount
            | AppError::VideoNotFound => StatusCode::BAD_REQUEST,
            AppError::InvalidProviderResponse { .. }
            | AppError::IncompleteCredential { .. }
            | AppError::InitFailed { .. }
            | AppError::UploadFailed { .. }
            | AppError::StorageCorrupt(_)
            | AppError::Upstream(_)
            | AppError::Unexpected(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn stable_code(&self) -> &'static str {
        match self {
            AppError::ConfigMissing => "CONFIG_MISSING",
            AppError::MissingCode => "MISSING_CODE",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::InvalidProviderResponse { .. } => "INVALID_PROVIDER_RESPONSE",
            AppError::IncompleteCredential { .. } => "INCOMPLETE_CREDENTIAL",
            AppError::NoConnectedAccount => "NO_CONNECTED_ACCOUNT",
            AppError::VideoNotFound => "VIDEO_NOT_FOUND",
            AppError::InitFailed { .. } => "INIT_FAILED",
            AppError::UploadFailed { .. } => "UPLOAD_FAILED",
            AppError::StorageCorrupt(_) => "STORAGE_CORRUPT",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Unexpected(_) => "UNEXPECTED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否属于具名分类之外的失败（用于决定日志级别）
    pub fn is_unclassified(&self) -> bool {
        matches!(
            self,
            AppError::Upstream(_) | AppError::Unexpected(_) | AppError::Internal(_)
        )
    }

    /// 把未分类的失败统一折叠为 `Unexpected`，具名错误原样返回
    pub fn into_publish_error(self) -> Self {
        match self {
            AppError::Upstream(msg) | AppError::Internal(msg) => AppError::Unexpected(msg),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = ErrorBody {
            ok: false,
            error: self.to_string(),
            code: self.stable_code().to_string(),
            request_id: crate::request_id::current_request_id(),
            raw: None,
            resp: None,
            status_code: None,
            text: None,
        };

        // 平台侧诊断信息原样回显（单操作者工具，可接受）
        match self {
            AppError::InvalidProviderResponse { raw } => body.raw = Some(raw),
            AppError::IncompleteCredential { resp } | AppError::InitFailed { resp } => {
                body.resp = Some(resp)
            }
            AppError::UploadFailed { status_code, text } => {
                body.status_code = Some(status_code);
                body.text = Some(text);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Upstream(format!("请求超时: {err}"))
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O 错误: {err}"))
    }
}
