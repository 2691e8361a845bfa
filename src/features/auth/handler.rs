use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// 平台回调携带的一次性授权码
    pub code: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CallbackResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = "TikTok account connected")]
    pub message: String,
    /// 已连接账号的 open_id
    #[schema(example = "-000abc123")]
    pub open_id: String,
}

#[utoipa::path(
    get,
    path = "/login_tiktok",
    summary = "跳转 TikTok 授权页",
    description = "构造携带 client_key、固定 scope（user.info.basic,video.upload,video.publish）与 redirect_uri 的授权页地址并 302 跳转。未配置 client_key 或 redirect_uri 时返回 400。",
    responses(
        (status = 302, description = "跳转到授权页"),
        (status = 400, description = "client_key 或 redirect_uri 未配置", body = crate::error::ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn login_tiktok(State(state): State<AppState>) -> Result<Response, AppError> {
    let url = state.tiktok.authorize_url()?;
    tracing::info!("redirecting to TikTok authorize page");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

#[utoipa::path(
    get,
    path = "/callback",
    summary = "OAuth 回调：授权码换 token",
    description = "用回调中的 code 向 token 端点换取 access_token 与 open_id，并写入凭据文件（同一 open_id 覆盖旧记录）。",
    params(CallbackQuery),
    responses(
        (status = 200, description = "账号已连接", body = CallbackResponse),
        (status = 400, description = "缺少 code", body = crate::error::ErrorBody),
        (status = 500, description = "平台响应无效或缺少凭据字段", body = crate::error::ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, AppError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    let grant = state.tiktok.exchange_code(&code).await.inspect_err(|e| {
        tracing::warn!(code = e.stable_code(), error = %e, "token 交换失败");
    })?;

    state
        .credentials
        .save(
            &grant.open_id,
            &grant.access_token,
            grant.refresh_token.as_deref(),
        )
        .await?;

    Ok(Json(CallbackResponse {
        ok: true,
        message: "TikTok account connected".to_string(),
        open_id: grant.open_id,
    }))
}

pub fn create_auth_router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/login_tiktok", get(login_tiktok))
        .route("/callback", get(callback))
}
