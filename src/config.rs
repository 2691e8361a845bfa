use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 授权时申请的固定 scope 列表
pub const TIKTOK_SCOPE: &str = "user.info.basic,video.upload,video.publish";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// TikTok 开放平台配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TikTokConfig {
    /// 应用 client_key（为空时 /login_tiktok 返回 CONFIG_MISSING）
    #[serde(default)]
    pub client_key: String,
    /// 应用 client_secret
    #[serde(default)]
    pub client_secret: String,
    /// OAuth 回调地址（须与开放平台后台登记一致）
    #[serde(default)]
    pub redirect_uri: String,
    /// 授权页地址
    #[serde(default = "TikTokConfig::default_authorize_url")]
    pub authorize_url: String,
    /// 开放接口基地址（token / upload init / create 均挂在其下）
    #[serde(default = "TikTokConfig::default_api_base_url")]
    pub api_base_url: String,
}

impl TikTokConfig {
    fn default_authorize_url() -> String {
        "https://www.tiktok.com/v2/auth/authorize/".to_string()
    }
    fn default_api_base_url() -> String {
        "https://open.tiktokapis.com/v2".to_string()
    }

    /// client_key 与 redirect_uri 是否都已配置
    pub fn is_login_configured(&self) -> bool {
        !self.client_key.is_empty() && !self.redirect_uri.is_empty()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// Token 交换端点
    pub fn token_endpoint(&self) -> String {
        self.endpoint("oauth/token/")
    }

    /// 上传初始化端点
    pub fn upload_init_endpoint(&self) -> String {
        self.endpoint("video/upload/init/")
    }

    /// 发布端点
    pub fn create_endpoint(&self) -> String {
        self.endpoint("video/create/")
    }
}

impl Default for TikTokConfig {
    fn default() -> Self {
        Self {
            client_key: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            authorize_url: Self::default_authorize_url(),
            api_base_url: Self::default_api_base_url(),
        }
    }
}

/// 本地存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 凭据 JSON 文件路径
    #[serde(default = "StorageConfig::default_file")]
    pub file: String,
    /// 上传视频的落盘目录
    #[serde(default = "StorageConfig::default_videos_dir")]
    pub videos_dir: String,
}

impl StorageConfig {
    fn default_file() -> String {
        "tokens.json".to_string()
    }
    fn default_videos_dir() -> String {
        "videos".to_string()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
            videos_dir: Self::default_videos_dir(),
        }
    }
}

/// 出站请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 单次出站请求超时（秒），0 表示不设置
    #[serde(default = "ProviderConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    fn default_timeout() -> u64 {
        60
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_any")]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_any")]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::default_any")]
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_any() -> Vec<String> {
        vec!["*".to_string()]
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Self::default_any(),
            allowed_methods: Self::default_any(),
            allowed_headers: Self::default_any(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 收到退出信号后等待在途请求完成的最长时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// TikTok 开放平台配置
    #[serde(default)]
    pub tiktok: TikTokConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    /// CORS 配置（默认放行任意来源）
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// 优先级（低 → 高）：
    /// 1. `config.toml`（可选）
    /// 2. `APP_` 前缀环境变量，例如 `APP_TIKTOK__CLIENT_KEY`
    /// 3. 裸环境变量 `CLIENT_KEY` / `CLIENT_SECRET` / `REDIRECT_URI` / `STORAGE_FILE`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let builder = ConfigBuilder::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = builder.try_deserialize()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());

        tracing::debug!(
            client_key_set = !config.tiktok.client_key.is_empty(),
            redirect_uri = %config.tiktok.redirect_uri,
            storage_file = %config.storage.file,
            "配置加载完成"
        );

        Ok(config)
    }

    /// 以裸环境变量覆盖对应字段（空值视为未设置）
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get("CLIENT_KEY") {
            self.tiktok.client_key = v;
        }
        if let Some(v) = get("CLIENT_SECRET") {
            self.tiktok.client_secret = v;
        }
        if let Some(v) = get("REDIRECT_URI") {
            self.tiktok.redirect_uri = v;
        }
        if let Some(v) = get("STORAGE_FILE") {
            self.storage.file = v;
        }
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<&'static AppConfig, ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        CONFIG
            .get()
            .ok_or_else(|| ConfigError::Message("配置初始化失败".to_string()))
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 凭据文件路径
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.file)
    }

    /// 视频落盘目录
    pub fn videos_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.videos_dir)
    }
}
