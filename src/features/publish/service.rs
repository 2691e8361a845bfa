use serde_json::Value;

use crate::error::AppError;
use crate::features::credentials::CredentialStore;
use crate::features::tiktok::TikTokClient;

/// 使用任意一个已存储凭据，按 init → PUT → create 发布本地视频。
///
/// 前两项校验失败时不会发起任何出站请求；三步协议中任一步失败即终止，不重试。
pub async fn publish_video(
    credentials: &CredentialStore,
    tiktok: &TikTokClient,
    caption: &str,
    video_path: Option<&str>,
) -> Result<Value, AppError> {
    let (open_id, access_token) = credentials
        .pick_any()
        .await?
        .filter(|(_, token)| !token.is_empty())
        .ok_or(AppError::NoConnectedAccount)?;

    let video_path = match video_path.filter(|p| !p.is_empty()) {
        Some(p) if matches!(tokio::fs::try_exists(p).await, Ok(true)) => p,
        _ => return Err(AppError::VideoNotFound),
    };

    tracing::info!(%open_id, path = video_path, "开始发布视频");

    let result = run_protocol(tiktok, &access_token, caption, video_path)
        .await
        .map_err(|e| {
            if e.is_unclassified() {
                tracing::error!(%open_id, error = %e, "posting failed");
            } else {
                tracing::warn!(%open_id, code = e.stable_code(), error = %e, "发布失败");
            }
            e.into_publish_error()
        })?;

    tracing::info!(%open_id, "发布请求已提交");
    Ok(result)
}

async fn run_protocol(
    tiktok: &TikTokClient,
    access_token: &str,
    caption: &str,
    video_path: &str,
) -> Result<Value, AppError> {
    let session = tiktok.init_upload(access_token).await?;

    let bytes = tokio::fs::read(video_path).await?;
    tiktok.upload_binary(&session.upload_url, bytes).await?;

    tiktok
        .create_post(access_token, session.video_id, caption)
        .await
}
