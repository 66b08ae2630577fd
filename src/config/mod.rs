#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_API_BASE_URL;
use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_ITEM_NOTES;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKEN_STORAGE_PATH: &str = "access_token.json";
pub const DEFAULT_LIST_DESCRIPTION: &str =
    "A list of movies from Reciperr, imported using reciperr2trakt";

/// Everything one run needs, resolved from defaults, the config file and
/// the command line.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_storage_path: String,
    pub username: String,
    pub list_name: String,
    pub list_description: String,
    pub source_url: String,
    pub api_base_url: String,
    pub item_notes: String,
    pub max_polls: Option<u32>,
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_storage_path: DEFAULT_TOKEN_STORAGE_PATH.to_string(),
            username: String::new(),
            list_name: String::new(),
            list_description: DEFAULT_LIST_DESCRIPTION.to_string(),
            source_url: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            item_notes: DEFAULT_ITEM_NOTES.to_string(),
            max_polls: None,
            dry_run: false,
        }
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_storage_path", &self.token_storage_path)
            .field("username", &self.username)
            .field("list_name", &self.list_name)
            .field("list_description", &self.list_description)
            .field("source_url", &self.source_url)
            .field("api_base_url", &self.api_base_url)
            .field("item_notes", &self.item_notes)
            .field("max_polls", &self.max_polls)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        let resolved = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("token_storage_path", &self.token_storage_path),
            ("username", &self.username),
            ("list_name", &self.list_name),
            ("source_url", &self.source_url),
            ("api_base_url", &self.api_base_url),
        ];
        for (field, value) in resolved {
            validation::validate_resolved(field, value)?;
        }

        validation::validate_required("client_id", &self.client_id)?;
        validation::validate_required("client_secret", &self.client_secret)?;
        validation::validate_required("username", &self.username)?;
        validation::validate_required("list_name", &self.list_name)?;
        validation::validate_path("token_storage_path", &self.token_storage_path)?;
        validation::validate_url("source_url", &self.source_url)?;
        validation::validate_url("api_base_url", &self.api_base_url)?;
        if let Some(max_polls) = self.max_polls {
            validation::validate_positive_number("max_polls", max_polls, 1)?;
        }
        Ok(())
    }
}

impl ConfigProvider for SyncConfig {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_secret(&self) -> &str {
        &self.client_secret
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn list_name(&self) -> &str {
        &self.list_name
    }

    fn list_description(&self) -> &str {
        &self.list_description
    }

    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn item_notes(&self) -> &str {
        &self.item_notes
    }

    fn max_polls(&self) -> Option<u32> {
        self.max_polls
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}
