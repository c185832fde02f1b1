//! Bearer token storage.

use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, DashboardResult};

/// Where the session token lives between runs.
///
/// The transport reads it before every request. Nothing in this crate writes
/// or clears it on its own, not even after a 401.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> DashboardResult<Option<String>>;
    fn set(&self, token: &str) -> DashboardResult<()>;
    fn clear(&self) -> DashboardResult<()>;
}

/// Token held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> DashboardResult<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn set(&self, token: &str) -> DashboardResult<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> DashboardResult<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Token persisted as a single-line file.
///
/// A missing or blank file means no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> DashboardError {
        DashboardError::token_store(format!(
            "Failed to {} token file {}: {}",
            action,
            self.path.display(),
            err
        ))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> DashboardResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error("read", e)),
        }
    }

    fn set(&self, token: &str) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        fs::write(&self.path, format!("{}\n", token.trim())).map_err(|e| self.io_error("write", e))
    }

    fn clear(&self) -> DashboardResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}
