use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BotError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.sgroup.qq.com";
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://www.mxnzp.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app_id: u64,
    pub token: String,
    pub lookup: LookupConfig,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    pub app_id: String,
    pub app_secret: String,
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_lookup_base_url() -> String {
    DEFAULT_LOOKUP_BASE_URL.to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./ipbot-cache")
}

fn default_cache_ttl_secs() -> u64 {
    60
}

impl Config {
    /// Loads the YAML config file, then applies `IPBOT_*` environment
    /// overrides so secrets can stay out of the file.
    pub fn load(path: &Path) -> Result<Config, BotError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config: Config = serde_yaml::from_str(&raw)
            .map_err(|e| BotError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(app_id) = std::env::var("IPBOT_APP_ID") {
            match app_id.parse() {
                Ok(id) => self.app_id = id,
                Err(_) => tracing::warn!("ignoring non-numeric IPBOT_APP_ID"),
            }
        }
        if let Ok(token) = std::env::var("IPBOT_TOKEN") {
            self.token = token;
        }
        if let Ok(app_id) = std::env::var("IPBOT_LOOKUP_APP_ID") {
            self.lookup.app_id = app_id;
        }
        if let Ok(secret) = std::env::var("IPBOT_LOOKUP_APP_SECRET") {
            self.lookup.app_secret = secret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("IPBOT_APP_ID");
        std::env::remove_var("IPBOT_TOKEN");
        std::env::remove_var("IPBOT_LOOKUP_APP_ID");
        std::env::remove_var("IPBOT_LOOKUP_APP_SECRET");
    }

    fn write_config(yaml: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).unwrap();
        (dir, path)
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        clear_env();
        let (_dir, path) = write_config(
            r#"
app_id: 101993071
token: "bot-secret"
lookup:
  app_id: "lk-id"
  app_secret: "lk-secret"
  base_url: "https://lookup.example"
api_base_url: "https://api.example"
cache:
  path: "/tmp/ipbot-test-cache"
  ttl_secs: 120
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.app_id, 101993071);
        assert_eq!(config.token, "bot-secret");
        assert_eq!(config.lookup.app_id, "lk-id");
        assert_eq!(config.lookup.app_secret, "lk-secret");
        assert_eq!(config.lookup.base_url, "https://lookup.example");
        assert_eq!(config.api_base_url, "https://api.example");
        assert_eq!(config.cache.path, PathBuf::from("/tmp/ipbot-test-cache"));
        assert_eq!(config.cache.ttl_secs, 120);
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        let (_dir, path) = write_config(
            r#"
app_id: 1
token: "t"
lookup:
  app_id: "a"
  app_secret: "s"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.lookup.base_url, DEFAULT_LOOKUP_BASE_URL);
        assert_eq!(config.cache.path, PathBuf::from("./ipbot-cache"));
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_config_error() {
        clear_env();
        let err = Config::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    #[serial]
    fn test_malformed_yaml_is_config_error() {
        clear_env();
        let (_dir, path) = write_config("app_id: [not a number");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_credentials() {
        clear_env();
        std::env::set_var("IPBOT_APP_ID", "42");
        std::env::set_var("IPBOT_TOKEN", "env-token");
        std::env::set_var("IPBOT_LOOKUP_APP_SECRET", "env-lk-secret");
        let (_dir, path) = write_config(
            r#"
app_id: 1
token: "file-token"
lookup:
  app_id: "a"
  app_secret: "file-lk-secret"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.app_id, 42);
        assert_eq!(config.token, "env-token");
        assert_eq!(config.lookup.app_secret, "env-lk-secret");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_non_numeric_env_app_id_ignored() {
        clear_env();
        std::env::set_var("IPBOT_APP_ID", "not-a-number");
        let (_dir, path) = write_config(
            r#"
app_id: 9
token: "t"
lookup:
  app_id: "a"
  app_secret: "s"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.app_id, 9);
        clear_env();
    }
}
