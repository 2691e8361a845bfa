use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// 根路径响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "TikTok Bot ready")]
    pub message: String,
}

/// 健康检查响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    #[schema(example = "healthy")]
    pub status: String,
    /// 服务名称
    #[schema(example = "tiktok-bridge")]
    pub service: String,
    /// 当前版本（Cargo package version）
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// 账号连接状态
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    #[schema(example = true)]
    pub ok: bool,
    /// 是否至少存有一个账号凭据
    pub connected_account: bool,
}

#[utoipa::path(
    get,
    path = "/",
    summary = "存活探测",
    responses((status = 200, description = "服务已就绪", body = RootResponse)),
    tag = "Health"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok".to_string(),
        message: "TikTok Bot ready".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "用于探活的健康检查端点，返回服务状态与版本信息。",
    responses((status = 200, description = "服务健康", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/status",
    summary = "账号连接状态",
    description = "仅反映凭据文件中是否存在账号，不校验 token 是否仍然有效，也不探测平台连通性。",
    responses(
        (status = 200, description = "状态返回", body = StatusResponse),
        (status = 500, description = "凭据文件损坏", body = crate::error::ErrorBody)
    ),
    tag = "Health"
)]
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let connected = state.credentials.pick_any().await?.is_some();
    Ok(Json(StatusResponse {
        ok: true,
        connected_account: connected,
    }))
}

pub fn create_health_router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/status", get(status))
}
