//! Client configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/docusearch/client.toml`
//! - Windows: `%APPDATA%/docusearch/client.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use docusearch_protocol::PageFeatures;
use docusearch_transfer::DEFAULT_CHUNK_SIZE;

/// Upload defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Category sent with every upload.
    pub category: String,
    /// Bytes per chunk for chunked uploads.
    pub chunk_size: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            category: "General".into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Search helper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Milliseconds between two search progress polls.
    pub poll_interval_ms: u64,
    /// Maximum number of example searches shown.
    pub suggestion_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            suggestion_limit: 6,
        }
    }
}

impl SearchSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `https://docs.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Cookie` header for an authenticated session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// Whether the user dismissed the onboarding tour.
    #[serde(default)]
    pub tour_dismissed: bool,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub features: PageFeatures,
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            tour_dismissed: false,
            upload: UploadSettings::default(),
            search: SearchSettings::default(),
            features: PageFeatures::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults without writing anything.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: ClientConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(ClientConfig::default())
        }
    }

    /// Saves the configuration to `path`, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        // Restrict permissions on Unix (may contain a session cookie).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(path)
    }

    /// `true` when a session cookie is configured.
    pub fn is_authenticated(&self) -> bool {
        self.session_cookie
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata)
            .join("docusearch")
            .join("client.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("docusearch")
            .join("client.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.upload.chunk_size, 2_097_152);
        assert_eq!(config.search.poll_interval(), Duration::from_secs(1));
        assert!(!config.is_authenticated());
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"
base_url = "https://docs.example.com"

[upload]
category = "Industry Insights"

[features]
tour = false
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://docs.example.com");
        assert_eq!(config.upload.category, "Industry Insights");
        assert_eq!(config.upload.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!config.features.tour);
        assert!(config.features.search_overlay);
        assert_eq!(config.search.suggestion_limit, 6);
    }

    #[test]
    fn blank_cookie_is_not_a_session() {
        let config = ClientConfig {
            session_cookie: Some("  ".into()),
            ..ClientConfig::default()
        };
        assert!(!config.is_authenticated());
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("docusearch"));
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("client.toml");

        let config = ClientConfig {
            session_cookie: Some("session=abc".into()),
            tour_dismissed: true,
            ..ClientConfig::default()
        };
        config.save(Some(&path)).unwrap();

        let loaded = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = ClientConfig::load(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, ClientConfig::default());
        assert!(!tmp.path().join("absent.toml").exists());
    }
}
