use reqwest::Client;

use crate::config::ProviderConfig;

/// 构建访问 TikTok 开放接口的 HTTP Client。
///
/// `Client` 内部带连接池且线程安全，整个进程共用一个实例（放在 `AppState` 中）。
pub fn build_provider_client(cfg: &ProviderConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = cfg.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
