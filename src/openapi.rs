use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::root,
        crate::features::health::handler::health_check,
        crate::features::health::handler::status,
        crate::features::auth::handler::login_tiktok,
        crate::features::auth::handler::callback,
        crate::features::upload::handler::upload_video,
        crate::features::publish::handler::postar,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::features::health::handler::RootResponse,
        crate::features::health::handler::HealthResponse,
        crate::features::health::handler::StatusResponse,
        crate::features::auth::handler::CallbackResponse,
        crate::features::upload::handler::UploadResponse,
        crate::features::upload::storage::StoredVideo,
        crate::features::publish::models::PublishForm,
        crate::features::publish::models::PublishResponse,
    )),
    tags(
        (name = "Auth", description = "TikTok OAuth：跳转授权页与授权码回调。"),
        (name = "Upload", description = "视频上传：落盘到本地视频目录。"),
        (
            name = "Publish",
            description = "视频发布：使用任意已连接账号执行 init → 上传 → create。"
        ),
        (name = "Health", description = "健康检查：服务探活与账号连接状态。"),
    ),
    info(
        title = "TikTok Bridge API",
        version = env!("CARGO_PKG_VERSION"),
        description = "单账号 TikTok 授权与视频发布中转服务（Axum + utoipa）。所有接口均不做调用方鉴权。"
    )
)]
pub struct ApiDoc;
