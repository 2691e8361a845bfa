pub mod models;
pub mod store;

pub use models::{CredentialRecord, TokenFile};
pub use store::CredentialStore;
