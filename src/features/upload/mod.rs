pub mod handler;
pub mod storage;

pub use handler::create_upload_router;
pub use storage::{StoredVideo, VideoStorage};
