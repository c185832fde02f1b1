#![allow(dead_code)]

use std::sync::Mutex;

use mealdash::config::{
    ENV_BASE_URL, ENV_CACHE_TTL_SECS, ENV_TIMEOUT_SECS, ENV_TOKEN_PATH, ENV_TRANSPORT,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable the client reads.
pub const MEALDASH_VARS: [&str; 5] = [
    ENV_BASE_URL,
    ENV_TIMEOUT_SECS,
    ENV_TOKEN_PATH,
    ENV_TRANSPORT,
    ENV_CACHE_TTL_SECS,
];

/// Run `f` with all `MEALDASH_*` variables cleared, then `set` applied.
///
/// Holds a process-wide lock so env-dependent tests do not race, and
/// restores the previous values afterwards, also on panic.
pub fn with_mealdash_env<F, R>(set: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvSnapshot::take();

    for name in MEALDASH_VARS {
        std::env::remove_var(name);
    }
    for (name, value) in set {
        std::env::set_var(name, value);
    }
    f()
}

struct EnvSnapshot(Vec<(&'static str, Option<String>)>);

impl EnvSnapshot {
    fn take() -> Self {
        Self(
            MEALDASH_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        )
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (name, value) in self.0.drain(..) {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}
