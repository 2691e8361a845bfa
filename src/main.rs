use tiktok_bridge::{AppConfig, AppState, build_app, shutdown};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiktok_bridge=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = match AppConfig::init_global() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Config init failed: {}", e);
            std::process::exit(1);
        }
    };
    if !config.tiktok.is_login_configured() {
        tracing::warn!("CLIENT_KEY 或 REDIRECT_URI 未设置，/login_tiktok 将返回 400");
    }
    tracing::warn!("所有接口均未做调用方鉴权，且授权跳转不带 state 参数，请仅在受信任网络中运行");

    // 凭据文件损坏视为致命错误
    let app_state = match AppState::from_config(config).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("State init failed: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_app(app_state, config);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Login: http://{}/login_tiktok", addr);
    tracing::info!("Token storage: {:?}", config.storage_path());
    tracing::info!("Videos: {:?}", config.videos_path());

    // 退出信号广播给 graceful shutdown 与超时计时
    let (signal_tx, signal_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown::wait_for_signal().await;
        let _ = signal_tx.send(true);
    });

    let mut graceful_rx = signal_rx.clone();
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = graceful_rx.changed().await;
        tracing::info!("开始优雅关闭HTTP服务器...");
    });
    let server = async move { graceful.await };

    let shutdown_timeout = config.shutdown.timeout_duration();
    let mut timeout_rx = signal_rx;
    let force_deadline = async move {
        if timeout_rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        tracing::info!("优雅退出超时时间: {}秒", shutdown_timeout.as_secs());
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        res = server => {
            if let Err(e) = res {
                tracing::error!("服务器运行错误: {}", e);
                std::process::exit(1);
            }
            tracing::info!("服务器已优雅关闭");
        }
        _ = force_deadline => {
            tracing::warn!("优雅退出超时，强制退出");
        }
    }
}
