use axum::{Router, extract::State, response::Json, routing::post};

use crate::error::AppError;
use crate::state::AppState;

use super::models::{PublishForm, PublishResponse};
use super::service::publish_video;

#[utoipa::path(
    post,
    path = "/postar",
    summary = "发布已上传的视频",
    description = "取任意一个已连接账号，依次调用 upload/init、PUT 视频字节、video/create。create 的响应原样放在 result 中返回。表单可用 urlencoded 或 multipart 编码。",
    request_body(content = PublishForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "create 已调用", body = PublishResponse),
        (status = 400, description = "无已连接账号或视频不存在", body = crate::error::ErrorBody),
        (status = 500, description = "init/上传失败或其它异常", body = crate::error::ErrorBody)
    ),
    tag = "Publish"
)]
pub async fn postar(
    State(state): State<AppState>,
    form: PublishForm,
) -> Result<Json<PublishResponse>, AppError> {
    let result = publish_video(
        &state.credentials,
        &state.tiktok,
        &form.caption,
        form.video_path.as_deref(),
    )
    .await?;

    Ok(Json(PublishResponse { ok: true, result }))
}

pub fn create_publish_router() -> Router<AppState> {
    Router::<AppState>::new().route("/postar", post(postar))
}
