use std::env;
use std::path::PathBuf;

/// Where blobs live and whose data a session reads.
///
/// Reads from `LARDER_DATA_PATH` and `LARDER_USER_ID`, falling back to
/// `data` and `default` when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory of the local blob store.
    pub data_path: PathBuf,
    /// Key prefix scoping every collection (`{user_id}/dishes.json`).
    pub user_id: String,
}

impl StoreConfig {
    /// Data directory used when no environment variable is set.
    pub const DEFAULT_DATA_PATH: &str = "data";
    /// User id used when no environment variable is set.
    pub const DEFAULT_USER_ID: &str = "default";

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        Self::new(Self::DEFAULT_DATA_PATH, Self::DEFAULT_USER_ID).with_env_overrides()
    }

    /// Replace each field whose environment variable is set.
    pub fn with_env_overrides(self) -> Self {
        Self {
            data_path: env::var_os("LARDER_DATA_PATH").map_or(self.data_path, PathBuf::from),
            user_id: env::var("LARDER_USER_ID").unwrap_or(self.user_id),
        }
    }

    /// Build a config from explicit values (tests and CLI flags).
    pub fn new(data_path: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            user_id: user_id.into(),
        }
    }

    /// Blob key for a collection file belonging to this user.
    pub fn key(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialize tests that mutate process-wide environment variables.
    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn explicit_new() {
        let cfg = StoreConfig::new("/var/lib/larder", "alice");
        assert_eq!(cfg.data_path, PathBuf::from("/var/lib/larder"));
        assert_eq!(cfg.user_id, "alice");
    }

    #[test]
    fn env_overrides_replace_only_what_is_set() {
        let _lock = lock_env();
        unsafe { env::remove_var("LARDER_DATA_PATH") };
        unsafe { env::set_var("LARDER_USER_ID", "from-env") };
        let cfg = StoreConfig::new("/from/file", "file-user").with_env_overrides();
        unsafe { env::remove_var("LARDER_USER_ID") };
        let defaults = StoreConfig::from_env();

        assert_eq!(cfg.data_path, PathBuf::from("/from/file"));
        assert_eq!(cfg.user_id, "from-env");
        assert_eq!(defaults, StoreConfig::new("data", "default"));
    }

    #[test]
    fn key_is_user_scoped() {
        let cfg = StoreConfig::new("data", "alice");
        assert_eq!(cfg.key("plans.json"), "alice/plans.json");
    }
}
