use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

const FALLBACK_NAME: &str = "upload.bin";

/// 上传视频落盘后的句柄；`path` 需由调用方原样传回 `/postar`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct StoredVideo {
    /// 生成的文件名：`<32 位 hex>_<原文件名>`
    #[schema(example = "3f2a9c0e4b7d4e0f9a1b2c3d4e5f6a7b_clip.mp4")]
    pub filename: String,
    /// 完整存储路径
    #[schema(example = "videos/3f2a9c0e4b7d4e0f9a1b2c3d4e5f6a7b_clip.mp4")]
    pub path: String,
}

/// 本地视频目录。文件只写不删。
#[derive(Debug, Clone)]
pub struct VideoStorage {
    dir: Arc<PathBuf>,
}

impl VideoStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 随机前缀 + 原文件名（只保留最后一个路径分量）
    pub fn generate_filename(original: Option<&str>) -> String {
        let base = original
            .and_then(|name| name.rsplit(['/', '\\']).next())
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .unwrap_or(FALLBACK_NAME);
        format!("{}_{}", Uuid::new_v4().simple(), base)
    }

    /// 确保目录存在并创建一个新文件，返回句柄与可写文件。
    pub async fn create(
        &self,
        original: Option<&str>,
    ) -> Result<(StoredVideo, tokio::fs::File), AppError> {
        tokio::fs::create_dir_all(self.dir()).await?;

        let filename = Self::generate_filename(original);
        let path = self.dir().join(&filename);
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        Ok((
            StoredVideo {
                filename,
                path: path.display().to_string(),
            },
            file,
        ))
    }
}
