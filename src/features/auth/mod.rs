pub mod handler;

// 对外导出路由构建函数，便于 main.rs 引用
pub use handler::create_auth_router;
