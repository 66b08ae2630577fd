pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{FileTokenStore, SourceClient, TraktClient};
pub use config::SyncConfig;
pub use core::{
    etl::{run_sync, SyncEngine},
    list_sync::ListSynchronizer,
    token_manager::TokenManager,
};
pub use utils::error::{Result, SyncError};
