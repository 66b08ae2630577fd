use crate::adapters::http::{SourceClient, TraktClient};
use crate::core::{ConfigProvider, Pipeline};
use crate::domain::model::{
    AddItemsSummary, Credential, ImdbIds, ItemsOutcome, ListItem, ListItemsPayload, NewList,
    RemoteList, SourceItem, SyncResult, TransformResult,
};
use crate::utils::error::Result;
use reqwest::StatusCode;

/// Projects source items into the list-items body. Items without an
/// external id are left out and counted.
pub fn build_payload(items: &[SourceItem], notes: &str) -> TransformResult {
    let mut movies = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        match item.external_id() {
            Some(imdb) => movies.push(ListItem {
                ids: ImdbIds {
                    imdb: imdb.to_string(),
                },
                notes: notes.to_string(),
            }),
            None => {
                tracing::warn!("Skipping '{}': no IMDb id", item.label());
                skipped += 1;
            }
        }
    }

    TransformResult {
        payload: ListItemsPayload { movies },
        skipped,
    }
}

/// First list whose name matches case-insensitively.
pub fn find_list<'a>(lists: &'a [RemoteList], name: &str) -> Option<&'a RemoteList> {
    lists.iter().find(|list| list.matches_name(name))
}

pub struct ListSynchronizer<C: ConfigProvider> {
    config: C,
    trakt: TraktClient,
    source: SourceClient,
    credential: Credential,
}

impl<C: ConfigProvider> ListSynchronizer<C> {
    pub fn new(config: C, trakt: TraktClient, source: SourceClient, credential: Credential) -> Self {
        Self {
            config,
            trakt,
            source,
            credential,
        }
    }

    pub async fn resolve_list(&self) -> Result<Option<RemoteList>> {
        let lists = self
            .trakt
            .fetch_lists(&self.credential, self.config.username())
            .await?;
        tracing::debug!("Account has {} lists", lists.len());

        Ok(find_list(&lists, self.config.list_name()).cloned())
    }

    pub async fn create_list(&self) -> Result<RemoteList> {
        let body = NewList::private_ranked(self.config.list_name(), self.config.list_description());
        let created = self
            .trakt
            .create_list(&self.credential, self.config.username(), &body)
            .await?;

        tracing::info!(
            "List created successfully. ID: {}, Slug: {}",
            created.id(),
            created.slug().unwrap_or("-")
        );
        Ok(created)
    }

    /// A rejected batch is reported, not raised: the list already exists.
    pub async fn upsert_items(
        &self,
        list_id: u64,
        payload: &ListItemsPayload,
    ) -> Result<ItemsOutcome> {
        let (status, body) = self
            .trakt
            .add_items(&self.credential, self.config.username(), list_id, payload)
            .await?;

        if status != StatusCode::CREATED {
            tracing::error!(
                "Failed to add movies. Status code: {}, Response: {}",
                status,
                body
            );
            return Ok(ItemsOutcome::Failed {
                status: status.as_u16(),
                body,
            });
        }

        let summary = serde_json::from_str::<AddItemsSummary>(&body).ok();
        match &summary {
            Some(s) => tracing::info!(
                "Movies added successfully: {} added, {} already listed, {} not found",
                s.added.movies,
                s.existing.movies,
                s.not_found.movies.len()
            ),
            None => tracing::info!("Movies added successfully."),
        }
        Ok(ItemsOutcome::Added(summary))
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for ListSynchronizer<C> {
    async fn extract(&self) -> Result<Vec<SourceItem>> {
        self.source.fetch_items(self.config.source_url()).await
    }

    async fn transform(&self, items: Vec<SourceItem>) -> Result<TransformResult> {
        Ok(build_payload(&items, self.config.item_notes()))
    }

    async fn load(&self, result: TransformResult) -> Result<SyncResult> {
        let TransformResult { payload, skipped } = result;
        let dry_run = self.config.dry_run();

        let (list, list_created) = match self.resolve_list().await? {
            Some(list) => {
                tracing::info!("Using existing list '{}' (ID: {})", list.name, list.id());
                (Some(list), false)
            }
            None if dry_run => {
                tracing::info!(
                    "Dry run: list '{}' does not exist and would be created",
                    self.config.list_name()
                );
                (None, false)
            }
            None => (Some(self.create_list().await?), true),
        };

        let items = if dry_run {
            tracing::info!("Dry run: {} movies would be submitted", payload.len());
            ItemsOutcome::Skipped
        } else if payload.is_empty() {
            tracing::warn!("No movies with an IMDb id to submit");
            ItemsOutcome::Skipped
        } else if let Some(list) = &list {
            self.upsert_items(list.id(), &payload).await?
        } else {
            ItemsOutcome::Skipped
        };

        Ok(SyncResult {
            list_id: list.as_ref().map(RemoteList::id),
            list_slug: list.as_ref().and_then(|l| l.slug().map(str::to_string)),
            list_created,
            submitted: if dry_run { 0 } else { payload.len() },
            skipped,
            items,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_ITEM_NOTES;

    fn item(imdb_id: Option<&str>) -> SourceItem {
        SourceItem {
            imdb_id: imdb_id.map(str::to_string),
            ..SourceItem::default()
        }
    }

    #[test]
    fn test_build_payload_keeps_order_and_notes() {
        let result = build_payload(&[item(Some("tt001")), item(Some("tt002"))], DEFAULT_ITEM_NOTES);

        assert_eq!(result.skipped, 0);
        assert_eq!(
            serde_json::to_value(&result.payload).unwrap(),
            serde_json::json!({
                "movies": [
                    {"ids": {"imdb": "tt001"}, "notes": "Added from Recipiarr"},
                    {"ids": {"imdb": "tt002"}, "notes": "Added from Recipiarr"}
                ]
            })
        );
    }

    #[test]
    fn test_build_payload_skips_items_without_ids() {
        let result = build_payload(&[item(None), item(Some("tt003")), item(Some(""))], "note");

        assert_eq!(result.payload.len(), 1);
        assert_eq!(result.payload.movies[0].ids.imdb, "tt003");
        assert_eq!(result.skipped, 2);
    }

    #[test]
    fn test_find_list_first_match_wins() {
        let lists: Vec<RemoteList> = serde_json::from_value(serde_json::json!([
            {"name": "Other", "ids": {"trakt": 1, "slug": "other"}},
            {"name": "My List", "ids": {"trakt": 2, "slug": "my-list"}},
            {"name": "my list", "ids": {"trakt": 3, "slug": "my-list-1"}}
        ]))
        .unwrap();

        assert_eq!(find_list(&lists, "my list").map(RemoteList::id), Some(2));
        assert!(find_list(&lists, "missing").is_none());
    }
}
