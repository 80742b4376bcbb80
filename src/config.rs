use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// Importer configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// GraphQL endpoint of the board service
    pub api_url: String,
    /// API token sent in the Authorization header
    pub api_token: String,
    /// Board that receives one item per episode
    pub board_id: String,
    /// Default group for new items (first board group when empty)
    pub group_id: Option<String>,
    /// Subitem board override (discovered from the board when empty)
    pub subitems_board_id: Option<String>,
    /// Number of PDF pages scanned for the header and character table
    pub max_pages: usize,
    /// Whether to log request payloads
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.monday.com/v2".to_string(),
            api_token: String::new(),
            board_id: String::new(),
            group_id: None,
            subitems_board_id: None,
            max_pages: 3,
            verbose_logging: false,
        }
    }
}

/// Optional TOML overlay, every key may be omitted
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    api_token: Option<String>,
    board_id: Option<String>,
    group_id: Option<String>,
    subitems_board_id: Option<String>,
    max_pages: Option<usize>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// Defaults overridden by the `MONDAY_*`, `MAX_PAGES` and
    /// `VERBOSE_LOGGING` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Defaults, then the TOML file (if any), then environment variables.
    ///
    /// # Parameters
    /// - `config_file`: optional TOML file, every key may be omitted
    ///
    /// # Returns
    /// The merged configuration, or `ConfigError::ReadFailed` /
    /// `ConfigError::TomlParseFailed` when the file is unusable
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(path) = config_file {
            config = config.with_file(path)?;
        }
        Ok(config.with_env())
    }

    fn with_file(self, path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(self.merge_file(file))
    }

    fn merge_file(self, file: FileConfig) -> Self {
        Self {
            api_url: file.api_url.unwrap_or(self.api_url),
            api_token: file.api_token.unwrap_or(self.api_token),
            board_id: file.board_id.unwrap_or(self.board_id),
            group_id: non_empty(file.group_id).or(self.group_id),
            subitems_board_id: non_empty(file.subitems_board_id).or(self.subitems_board_id),
            max_pages: file.max_pages.unwrap_or(self.max_pages),
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
        }
    }

    fn with_env(self) -> Self {
        Self {
            api_url: std::env::var("MONDAY_API_URL").unwrap_or(self.api_url),
            api_token: std::env::var("MONDAY_API_TOKEN").unwrap_or(self.api_token),
            board_id: std::env::var("MONDAY_BOARD_ID").unwrap_or(self.board_id),
            group_id: non_empty(std::env::var("MONDAY_GROUP_ID").ok()).or(self.group_id),
            subitems_board_id: non_empty(std::env::var("MONDAY_SUBITEMS_BOARD_ID").ok())
                .or(self.subitems_board_id),
            max_pages: std::env::var("MAX_PAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_pages),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// Apply command-line overrides; blank values keep the configured default.
    ///
    /// # Parameters
    /// - `board_id`: replaces `board_id`
    /// - `group_id`: group for the new item
    /// - `subitems_board_id`: skips subitem board discovery
    pub fn with_overrides(
        mut self,
        board_id: Option<String>,
        group_id: Option<String>,
        subitems_board_id: Option<String>,
    ) -> Self {
        if let Some(board_id) = non_empty(board_id) {
            self.board_id = board_id;
        }
        if let Some(group_id) = non_empty(group_id) {
            self.group_id = Some(group_id);
        }
        if let Some(subitems_board_id) = non_empty(subitems_board_id) {
            self.subitems_board_id = Some(subitems_board_id);
        }
        self
    }

    /// Board id and token must be present before any remote call.
    ///
    /// # Returns
    /// `ConfigError::Missing` naming the first absent value and its env var
    pub fn validate(&self) -> AppResult<()> {
        if self.board_id.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: "Board ID",
                env_var: "MONDAY_BOARD_ID",
            }
            .into());
        }
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: "API token",
                env_var: "MONDAY_API_TOKEN",
            }
            .into());
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_replace_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            board_id = "987"
            group_id = "topics"
            subitems_board_id = ""
            max_pages = 2
            "#,
        )
        .unwrap();

        let config = Config::default().merge_file(file);
        assert_eq!(config.board_id, "987");
        assert_eq!(config.group_id.as_deref(), Some("topics"));
        assert_eq!(config.subitems_board_id, None);
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.api_url, "https://api.monday.com/v2");
    }

    #[test]
    fn blank_overrides_keep_defaults() {
        let config = Config {
            group_id: Some("topics".into()),
            ..Config::default()
        }
        .with_overrides(None, Some("  ".into()), Some("555".into()));

        assert_eq!(config.group_id.as_deref(), Some("topics"));
        assert_eq!(config.subitems_board_id.as_deref(), Some("555"));
    }

    #[test]
    fn validate_requires_board_and_token() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.board_id = "1".into();
        assert!(config.validate().is_err());

        config.api_token = "secret".into();
        assert!(config.validate().is_ok());
    }
}
