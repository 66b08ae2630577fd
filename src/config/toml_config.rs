use crate::config::SyncConfig;
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub trakt: TraktSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub list: ListSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraktSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base_url: Option<String>,
    pub token_storage_path: Option<String>,
    pub max_polls: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSection {
    pub username: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub item_notes: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SyncError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply_to(&self, config: &mut SyncConfig) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.client_id, &self.trakt.client_id);
        set(&mut config.client_secret, &self.trakt.client_secret);
        set(&mut config.api_base_url, &self.trakt.api_base_url);
        set(&mut config.token_storage_path, &self.trakt.token_storage_path);
        set(&mut config.source_url, &self.source.url);
        set(&mut config.username, &self.list.username);
        set(&mut config.list_name, &self.list.name);
        set(&mut config.list_description, &self.list.description);
        set(&mut config.item_notes, &self.list.item_notes);
        if self.trakt.max_polls.is_some() {
            config.max_polls = self.trakt.max_polls;
        }
    }

    pub fn into_sync_config(self) -> SyncConfig {
        let mut config = SyncConfig::default();
        self.apply_to(&mut config);
        config
    }
}
