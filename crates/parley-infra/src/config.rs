//! Gateway configuration loader for Parley.
//!
//! Reads a TOML file (`~/.parley/config.toml` unless `--conf` points
//! elsewhere) and deserializes it into [`GatewayConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use parley_types::config::GatewayConfig;

/// Load the gateway configuration from `path`.
///
/// - If the file does not exist, returns [`GatewayConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(path: &Path) -> GatewayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GatewayConfig::default()
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    // Last resort: current directory
    PathBuf::from(".parley")
}

/// `config.toml` inside the data directory.
pub fn default_config_path() -> PathBuf {
    resolve_data_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config.websocket_port, 8765);
        assert_eq!(config.author, "Oscar");
        assert!(config.database.is_none());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
websocket_port = 9000
author = "Ada"
database = "/var/lib/parley/parley.db"

[chat]
subject_threshold = 90

[[forms]]
aliases = ["add partner"]
required = ["name", "country"]
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.websocket_port, 9000);
        assert_eq!(config.author, "Ada");
        assert_eq!(
            config.database,
            Some(PathBuf::from("/var/lib/parley/parley.db"))
        );
        assert_eq!(config.chat.subject_threshold, 90);
        assert_eq!(config.chat.cancel_threshold, 97);
        assert_eq!(config.forms.len(), 1);
        assert_eq!(config.forms[0].required, vec!["name", "country"]);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.websocket_port, 8765);
        assert!(config.forms.is_empty());
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("PARLEY_DATA_DIR", "/tmp/test-parley");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-parley"));
        assert_eq!(
            default_config_path(),
            PathBuf::from("/tmp/test-parley/config.toml")
        );
        unsafe {
            std::env::remove_var("PARLEY_DATA_DIR");
        }
    }
}
