use crate::config::toml_config::TomlConfig;
use crate::config::SyncConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "reciperr2trakt")]
#[command(about = "Sync a Reciperr movie list into a Trakt list")]
pub struct CliArgs {
    /// TOML file with [trakt], [source] and [list] sections
    #[arg(short, long, env = "RECIPERR2TRAKT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "TRAKT_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "TRAKT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Trakt account that owns the list
    #[arg(long, env = "TRAKT_USERNAME")]
    pub username: Option<String>,

    #[arg(long)]
    pub list_name: Option<String>,

    #[arg(long)]
    pub list_description: Option<String>,

    /// Reciperr (StevenLu format) JSON list URL
    #[arg(long)]
    pub source_url: Option<String>,

    #[arg(long)]
    pub token_storage_path: Option<String>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Note attached to every submitted movie
    #[arg(long)]
    pub item_notes: Option<String>,

    /// Give up on authorization after this many token polls
    #[arg(long)]
    pub max_polls: Option<u32>,

    /// Resolve the list but do not create it or submit movies
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliArgs {
    /// Defaults, then the config file, then flags and environment.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_sync_config(),
            None => SyncConfig::default(),
        };

        let overrides = [
            (&mut config.client_id, &self.client_id),
            (&mut config.client_secret, &self.client_secret),
            (&mut config.username, &self.username),
            (&mut config.list_name, &self.list_name),
            (&mut config.list_description, &self.list_description),
            (&mut config.source_url, &self.source_url),
            (&mut config.token_storage_path, &self.token_storage_path),
            (&mut config.api_base_url, &self.api_base_url),
            (&mut config.item_notes, &self.item_notes),
        ];
        for (target, value) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        if self.max_polls.is_some() {
            config.max_polls = self.max_polls;
        }
        config.dry_run = self.dry_run;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_only() {
        let args = CliArgs::try_parse_from([
            "reciperr2trakt",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--username",
            "d-sync",
            "--list-name",
            "Aliens",
            "--source-url",
            "https://reciperr.com/api",
            "--dry-run",
        ])
        .unwrap();

        let config = args.resolve().unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.username, "d-sync");
        assert_eq!(config.token_storage_path, "access_token.json");
        assert!(config.dry_run);
        assert_eq!(config.max_polls, None);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[trakt]
client_id = "file-id"
client_secret = "file-secret"
max_polls = 5

[list]
username = "file-user"
name = "File List"
"#
        )
        .unwrap();

        let args = CliArgs::try_parse_from([
            "reciperr2trakt",
            "--config",
            file.path().to_str().unwrap(),
            "--list-name",
            "Flag List",
        ])
        .unwrap();

        let config = args.resolve().unwrap();
        assert_eq!(config.client_id, "file-id");
        assert_eq!(config.username, "file-user");
        assert_eq!(config.list_name, "Flag List");
        assert_eq!(config.max_polls, Some(5));
    }
}
