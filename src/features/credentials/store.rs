use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::AppError;

use super::models::{CredentialRecord, TokenFile};

/// 基于单个 JSON 文件的凭据存储。
///
/// 文件是唯一的数据源：每次操作都完整读取，每次写入都完整重写。
/// 所有读-改-写经同一把锁串行化，并发请求不会互相覆盖对方的记录。
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    /// 打开存储：文件不存在时写入空容器，随后完整加载一次以校验格式。
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        };

        {
            let _guard = store.lock.lock().await;
            if !tokio::fs::try_exists(store.path()).await? {
                if let Some(parent) = store.path().parent()
                    && !parent.as_os_str().is_empty()
                {
                    tokio::fs::create_dir_all(parent).await?;
                }
                store.write_file(&TokenFile::default()).await?;
                tracing::info!(path = %store.path().display(), "已创建空的凭据文件");
            }
        }

        let accounts = store.accounts().await?;
        tracing::info!(
            path = %store.path().display(),
            accounts = accounts.len(),
            "凭据存储已就绪"
        );
        tracing::debug!(?accounts, "已连接账号");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取完整的凭据映射
    pub async fn load(&self) -> Result<TokenFile, AppError> {
        let _guard = self.lock.lock().await;
        self.read_file().await
    }

    /// 插入或覆盖 `open_id` 对应的记录，并整体重写文件。
    pub async fn save(
        &self,
        open_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_file().await?;
        file.accounts.insert(
            open_id.to_string(),
            CredentialRecord {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.map(str::to_string),
            },
        );
        self.write_file(&file).await?;
        tracing::info!(open_id, "Saved token for {}", open_id);
        Ok(())
    }

    /// 返回任意一个已存储账号的 `(open_id, access_token)`。
    ///
    /// 取文件迭代顺序中的第一条，不做任何选择策略；无账号时返回 `None`。
    pub async fn pick_any(&self) -> Result<Option<(String, String)>, AppError> {
        let file = self.load().await?;
        Ok(file
            .first()
            .map(|(id, rec)| (id.to_string(), rec.access_token.clone())))
    }

    /// 所有已连接账号的 open_id（文件顺序）
    pub async fn accounts(&self) -> Result<Vec<String>, AppError> {
        let file = self.load().await?;
        Ok(file.accounts.into_keys().collect())
    }

    async fn read_file(&self) -> Result<TokenFile, AppError> {
        let data = match tokio::fs::read_to_string(self.path()).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path().display(), "凭据文件不存在，按空存储处理");
                return Ok(TokenFile::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data).map_err(|e| {
            tracing::error!(path = %self.path().display(), error = %e, "凭据文件解析失败");
            AppError::StorageCorrupt(e.to_string())
        })
    }

    async fn write_file(&self, file: &TokenFile) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(file)
            .map_err(|e| AppError::Internal(format!("序列化凭据失败: {e}")))?;
        tokio::fs::write(self.path(), data).await?;
        Ok(())
    }
}
