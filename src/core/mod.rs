pub mod etl;
pub mod list_sync;
pub mod token_manager;

pub use crate::domain::model::{SourceItem, SyncResult, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, TokenStore};
pub use crate::utils::error::Result;
