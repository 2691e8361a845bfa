use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::features::credentials::CredentialStore;
use crate::features::tiktok::TikTokClient;
use crate::features::upload::VideoStorage;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub tiktok: Arc<TikTokClient>,
    /// 凭据存储（内部已串行化读写）
    pub credentials: CredentialStore,
    /// 上传视频目录
    pub videos: VideoStorage,
}

impl AppState {
    /// 按配置初始化：打开（必要时创建）凭据文件，构建平台客户端。
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let credentials = CredentialStore::open(config.storage_path()).await?;
        let tiktok = TikTokClient::new(config.tiktok.clone(), &config.provider)?;
        Ok(Self {
            tiktok: Arc::new(tiktok),
            credentials,
            videos: VideoStorage::new(config.videos_path()),
        })
    }
}
