
use std::env;

use tempfile::TempDir;

/// Every override `Config::load` reads, cleared so the host environment
/// cannot leak into a test
const OVERRIDES: &[&str] = &[
    "MP_HOMESERVER_ADDRESS",
    "MP_HOMESERVER_DOMAIN",
    "MP_AS_TOKEN",
    "MP_REQUEST_TIMEOUT_SECS",
    "MP_BRIDGE_MODE",
    "MP_USERNAME_TEMPLATE",
    "MP_DISPLAYNAME_TEMPLATE",
    "MP_PROFILE_METADATA",
    "MP_DATABASE_PATH",
    "MP_LOG_LEVEL",
    "MP_LOG_COLORED",
    "MP_LOG_FILE",
];

/// Restores one environment variable on drop. Tests using it must be `#[serial]`.
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let original = env::var(key).ok();
        unsafe { env::set_var(key, value) };
        Self { key, original }
    }

    fn unset(key: &'static str) -> Self {
        let original = env::var(key).ok();
        unsafe { env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match self.original.take() {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Point MP_CONFIG_DIR at a fresh temp directory with no overrides set
pub(crate) fn setup_config_dir() -> (TempDir, Vec<EnvGuard>) {
    let temp = TempDir::new().unwrap();

    let mut guards: Vec<EnvGuard> = OVERRIDES.iter().map(|&key| EnvGuard::unset(key)).collect();
    guards.push(EnvGuard::set(
        "MP_CONFIG_DIR",
        temp.path().to_str().unwrap(),
    ));

    (temp, guards)
}
