//! Shared test utilities for integration tests
//!
//! Serializes access to process environment variables so config tests that
//! set `XDG_CONFIG_HOME` or `YANG_CONTEXT__*` overrides don't race.

use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with `XDG_CONFIG_HOME` pointed at `config_home` and `vars` set,
/// restoring the previous values afterwards.
pub fn with_env<F, R>(config_home: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut saved: Vec<(String, Option<String>)> = Vec::new();
    let mut set = |key: &str, value: &str| {
        saved.push((key.to_string(), std::env::var(key).ok()));
        std::env::set_var(key, value);
    };

    set("XDG_CONFIG_HOME", config_home.path().to_str().unwrap());
    for (key, value) in vars {
        set(key, value);
    }

    let result = f();

    for (key, value) in saved.into_iter().rev() {
        match value {
            Some(orig) => std::env::set_var(&key, orig),
            None => std::env::remove_var(&key),
        }
    }

    result
}
