//! TikTok 开放平台客户端：OAuth token 交换与 init → PUT → create 发布三步协议。

pub mod client;
pub mod extract;
pub mod models;

pub use client::TikTokClient;
pub use models::{TokenGrant, UploadSession};
