// Adapters layer: concrete implementations for external systems.

pub mod http;
pub mod storage;

pub use http::{SourceClient, TraktClient};
pub use storage::FileTokenStore;
