/// OAuth 授权跳转与回调
pub mod auth;
/// 凭据文件存储
pub mod credentials;
/// 存活与账号状态
pub mod health;
/// 视频发布编排
pub mod publish;
/// TikTok 开放平台客户端
pub mod tiktok;
/// 视频上传落盘
pub mod upload;
