use crate::adapters::http::{SourceClient, TraktClient};
use crate::core::list_sync::ListSynchronizer;
use crate::core::token_manager::TokenManager;
use crate::core::{ConfigProvider, Pipeline, TokenStore};
use crate::domain::model::SyncResult;
use crate::utils::error::Result;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<SyncResult> {
        tracing::info!("Fetching source movies...");
        let items = self.pipeline.extract().await?;
        tracing::info!("Fetched {} source movies", items.len());

        let transformed = self.pipeline.transform(items).await?;
        tracing::info!(
            "Prepared {} movies ({} skipped)",
            transformed.payload.len(),
            transformed.skipped
        );

        tracing::info!("Syncing list...");
        self.pipeline.load(transformed).await
    }
}

/// Full run: obtain a credential, then sync the list with it.
pub async fn run_sync<C, S>(config: C, store: S) -> Result<SyncResult>
where
    C: ConfigProvider,
    S: TokenStore,
{
    let trakt = TraktClient::from_config(&config)?;
    let credential = TokenManager::from_config(store, trakt.clone(), &config)
        .obtain_credential()
        .await?;

    let synchronizer = ListSynchronizer::new(config, trakt, SourceClient::new()?, credential);
    SyncEngine::new(synchronizer).run().await
}
