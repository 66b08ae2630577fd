use crate::domain::model::{Credential, SourceItem, SyncResult, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait TokenStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Option<Credential>>> + Send;
    fn save(&self, credential: &Credential)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
    fn api_base_url(&self) -> &str;
    fn username(&self) -> &str;
    fn list_name(&self) -> &str;
    fn list_description(&self) -> &str;
    fn source_url(&self) -> &str;
    fn item_notes(&self) -> &str;
    fn max_polls(&self) -> Option<u32>;
    fn dry_run(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceItem>>;
    async fn transform(&self, items: Vec<SourceItem>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<SyncResult>;
}
