//! Configuration file management for larder.
//!
//! Provides a TOML-based config file at `~/.config/larder/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use larder_store::StoreConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Directory holding the blob store.
    pub data_path: Option<PathBuf>,
    /// Whose collections to read and write.
    pub user_id: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the larder config directory: `$XDG_CONFIG_HOME/larder` or
/// `~/.config/larder`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("larder");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("larder")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Resolve the store location using the chain: CLI flag > env var > config
/// file > default.
///
/// - Data path: `cli_data_path` > `LARDER_DATA_PATH` > `store.data_path` > `data`
/// - User id: `cli_user` > `LARDER_USER_ID` > `store.user_id` > `default`
///
/// A missing config file is not an error; a malformed one is.
pub fn resolve(cli_data_path: Option<PathBuf>, cli_user: Option<String>) -> Result<StoreConfig> {
    let file_config = if config_path().exists() {
        Some(load_config()?)
    } else {
        None
    };
    let file_store = file_config.map(|c| c.store).unwrap_or_default();

    let base = StoreConfig::new(
        file_store
            .data_path
            .unwrap_or_else(|| PathBuf::from(StoreConfig::DEFAULT_DATA_PATH)),
        file_store
            .user_id
            .unwrap_or_else(|| StoreConfig::DEFAULT_USER_ID.to_owned()),
    );
    let resolved = base.with_env_overrides();

    Ok(StoreConfig {
        data_path: cli_data_path.unwrap_or(resolved.data_path),
        user_id: cli_user.unwrap_or(resolved.user_id),
    })
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point XDG_CONFIG_HOME at a temp dir and clear the store env vars.
    fn isolated_env() -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().unwrap();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var("LARDER_DATA_PATH") };
        unsafe { std::env::remove_var("LARDER_USER_ID") };
        tmp
    }

    fn restore_env() {
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        unsafe { std::env::remove_var("LARDER_DATA_PATH") };
        unsafe { std::env::remove_var("LARDER_USER_ID") };
    }

    fn write_file(data_path: &str, user_id: &str) {
        save_config(&ConfigFile {
            store: StoreSection {
                data_path: Some(PathBuf::from(data_path)),
                user_id: Some(user_id.to_owned()),
            },
        })
        .unwrap();
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        write_file("/srv/larder", "alice");
        let loaded = load_config().unwrap();

        restore_env();
        assert_eq!(loaded.store.data_path, Some(PathBuf::from("/srv/larder")));
        assert_eq!(loaded.store.user_id.as_deref(), Some("alice"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let _tmp = isolated_env();

        write_file("data", "default");
        let meta = std::fs::metadata(config_path()).unwrap();

        restore_env();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        let cfg = resolve(None, None).unwrap();

        restore_env();
        assert_eq!(cfg.data_path, PathBuf::from(StoreConfig::DEFAULT_DATA_PATH));
        assert_eq!(cfg.user_id, StoreConfig::DEFAULT_USER_ID);
    }

    #[test]
    fn resolve_prefers_file_over_default() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        write_file("/from/file", "file-user");
        let cfg = resolve(None, None).unwrap();

        restore_env();
        assert_eq!(cfg.data_path, PathBuf::from("/from/file"));
        assert_eq!(cfg.user_id, "file-user");
    }

    #[test]
    fn resolve_env_overrides_config_file() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        write_file("/from/file", "file-user");
        unsafe { std::env::set_var("LARDER_DATA_PATH", "/from/env") };
        unsafe { std::env::set_var("LARDER_USER_ID", "env-user") };
        let cfg = resolve(None, None).unwrap();

        restore_env();
        assert_eq!(cfg.data_path, PathBuf::from("/from/env"));
        assert_eq!(cfg.user_id, "env-user");
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        write_file("/from/file", "file-user");
        unsafe { std::env::set_var("LARDER_DATA_PATH", "/from/env") };
        let cfg = resolve(Some(PathBuf::from("/from/flag")), Some("flag-user".into())).unwrap();

        restore_env();
        assert_eq!(cfg.data_path, PathBuf::from("/from/flag"));
        assert_eq!(cfg.user_id, "flag-user");
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let _lock = lock_env();
        let _tmp = isolated_env();

        std::fs::create_dir_all(config_dir()).unwrap();
        std::fs::write(config_path(), "store = [").unwrap();
        let result = resolve(None, None);

        restore_env();
        assert!(result.is_err());
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("larder/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
