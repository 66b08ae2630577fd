use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_NOTES: &str = "Added from Recipiarr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Unknown,
    Valid,
    Invalid,
}

/// Bearer token plus what we currently know about it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    validity: Validity,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            validity: Validity::Unknown,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn mark_valid(mut self) -> Self {
        self.validity = Validity::Valid;
        self
    }

    pub fn mark_invalid(mut self) -> Self {
        self.validity = Validity::Invalid;
        self
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("validity", &self.validity)
            .finish()
    }
}

/// On-disk token file shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub interval: u64,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Granted(String),
    Pending,
    Malformed(String),
    Rejected { status: u16, description: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceItem {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_year: Option<serde_json::Value>,
}

impl SourceItem {
    /// Trimmed, non-empty identifier or nothing.
    pub fn external_id(&self) -> Option<&str> {
        self.imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or("<untitled>")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListIds {
    pub trakt: u64,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteList {
    #[serde(default)]
    pub name: String,
    pub ids: ListIds,
}

impl RemoteList {
    pub fn id(&self) -> u64 {
        self.ids.trakt
    }

    pub fn slug(&self) -> Option<&str> {
        self.ids.slug.as_deref()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewList {
    pub name: String,
    pub description: String,
    pub privacy: String,
    pub display_numbers: bool,
    pub allow_comments: bool,
    pub sort_by: String,
    pub sort_how: String,
}

impl NewList {
    pub fn private_ranked(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            privacy: "private".to_string(),
            display_numbers: false,
            allow_comments: true,
            sort_by: "rank".to_string(),
            sort_how: "asc".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImdbIds {
    pub imdb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub ids: ImdbIds,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItemsPayload {
    pub movies: Vec<ListItem>,
}

impl ListItemsPayload {
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Output of the transform phase.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub payload: ListItemsPayload,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieCount {
    #[serde(default)]
    pub movies: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotFound {
    #[serde(default)]
    pub movies: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemsSummary {
    #[serde(default)]
    pub added: MovieCount,
    #[serde(default)]
    pub existing: MovieCount,
    #[serde(default)]
    pub not_found: NotFound,
}

#[derive(Debug, Clone)]
pub enum ItemsOutcome {
    Added(Option<AddItemsSummary>),
    Failed { status: u16, body: String },
    Skipped,
}

#[derive(Debug, Clone)]
pub struct SyncResult {
    pub list_id: Option<u64>,
    pub list_slug: Option<String>,
    pub list_created: bool,
    pub submitted: usize,
    pub skipped: usize,
    pub items: ItemsOutcome,
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_token() {
        let credential = Credential::new("secret-token").mark_valid();
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("Valid"));
    }

    #[test]
    fn test_external_id_ignores_blank_values() {
        let item: SourceItem = serde_json::from_str(r#"{"imdb_id": "  "}"#).unwrap();
        assert_eq!(item.external_id(), None);

        let item: SourceItem =
            serde_json::from_str(r#"{"imdb_id": "tt0090605", "title": "Aliens"}"#).unwrap();
        assert_eq!(item.external_id(), Some("tt0090605"));
        assert_eq!(item.label(), "Aliens");
    }

    #[test]
    fn test_list_name_match_is_case_insensitive() {
        let list: RemoteList =
            serde_json::from_str(r#"{"name": "My List", "ids": {"trakt": 7, "slug": "my-list"}}"#)
                .unwrap();
        assert!(list.matches_name("my list"));
        assert!(list.matches_name("MY LIST"));
        assert!(!list.matches_name("my lists"));
        assert_eq!(list.slug(), Some("my-list"));
    }

    #[test]
    fn test_new_list_body() {
        let body = serde_json::to_value(NewList::private_ranked("Aliens", "desc")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "Aliens",
                "description": "desc",
                "privacy": "private",
                "display_numbers": false,
                "allow_comments": true,
                "sort_by": "rank",
                "sort_how": "asc"
            })
        );
    }
}
