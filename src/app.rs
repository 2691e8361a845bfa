use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::features::{auth, health, publish, upload};
use crate::openapi::ApiDoc;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

/// 装配全部路由与中间件。
///
/// 所有接口都不做调用方鉴权；CORS 默认放行任意来源。
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::<AppState>::new()
        .merge(health::create_health_router())
        .merge(auth::create_auth_router())
        .merge(upload::create_upload_router())
        .merge(publish::create_publish_router())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match build_cors_layer(&config.cors) {
        Some(cors) => app = app.layer(cors),
        None => tracing::info!("CORS 未启用"),
    }

    app.layer(axum::middleware::from_fn(request_id_middleware))
}
