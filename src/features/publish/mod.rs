pub mod handler;
pub mod models;
pub mod service;

pub use handler::create_publish_router;
pub use models::PublishForm;
pub use service::publish_video;
