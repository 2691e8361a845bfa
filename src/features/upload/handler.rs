use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartError},
    },
    response::Json,
    routing::post,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;
use crate::state::AppState;

use super::storage::StoredVideo;

/// 存放视频的 multipart 字段名
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[serde(flatten)]
    pub video: StoredVideo,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("multipart 解析失败: {}", e.body_text()))
}

#[utoipa::path(
    post,
    path = "/upload_video",
    summary = "上传视频到本地",
    description = "接收 multipart 中名为 file 的文件，以 `<随机hex>_<原文件名>` 写入本地视频目录，返回生成的文件名与完整路径。无大小与类型限制，文件不会被自动清理。",
    request_body(
        content = Object,
        description = "multipart 表单，字段 `file` 为视频文件",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "已保存", body = UploadResponse),
        (status = 400, description = "缺少 file 字段或 multipart 格式错误", body = crate::error::ErrorBody)
    ),
    tag = "Upload"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original = field.file_name().map(str::to_string);
        let (video, mut file) = state.videos.create(original.as_deref()).await?;

        let size = match write_field(&mut field, &mut file).await {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                // 写到一半的文件调用方拿不到路径，直接删掉
                if let Err(rm) = tokio::fs::remove_file(&video.path).await {
                    tracing::warn!(path = %video.path, error = %rm, "清理未完成的上传失败");
                }
                return Err(e);
            }
        };

        tracing::info!(path = %video.path, size, "Saved upload to {}", video.path);
        return Ok(Json(UploadResponse { ok: true, video }));
    }

    Err(AppError::Validation(format!(
        "missing multipart field `{FILE_FIELD}`"
    )))
}

async fn write_field(
    field: &mut Field<'_>,
    file: &mut tokio::fs::File,
) -> Result<usize, AppError> {
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len();
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(size)
}

pub fn create_upload_router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/upload_video", post(upload_video))
        // 视频体积不设上限
        .layer(DefaultBodyLimit::disable())
}
