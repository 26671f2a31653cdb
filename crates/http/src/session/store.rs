//! Token store: the current credential pair plus display identity
//!
//! Stores never validate token contents. An empty string reads back as
//! absent, everything else is returned verbatim.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Token store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to persist session to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode session: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Display-only attributes of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Storage for the access/refresh pair shared by every authenticated call
pub trait TokenStore: Send + Sync {
    /// Current access token
    fn access(&self) -> Option<String>;

    /// Current refresh token
    fn refresh(&self) -> Option<String>;

    /// Identity stored next to the tokens
    fn identity(&self) -> SessionIdentity;

    /// Replace the access token, keeping the refresh token
    fn set_access(&self, access: &str) -> Result<(), StoreError>;

    /// Replace both tokens
    fn set_pair(&self, access: &str, refresh: &str) -> Result<(), StoreError>;

    /// Replace the identity
    fn set_identity(&self, identity: SessionIdentity) -> Result<(), StoreError>;

    /// Remove both tokens and the identity
    fn clear(&self) -> Result<(), StoreError>;
}

/// Serialized form shared by the store implementations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    identity: SessionIdentity,
}

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl SessionRecord {
    fn access(&self) -> Option<String> {
        present(self.access.as_ref())
    }

    fn refresh(&self) -> Option<String> {
        present(self.refresh.as_ref())
    }
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    record: RwLock<SessionRecord>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a credential pair
    pub fn with_pair(access: &str, refresh: &str) -> Self {
        Self {
            record: RwLock::new(SessionRecord {
                access: Some(access.to_string()),
                refresh: Some(refresh.to_string()),
                identity: SessionIdentity::default(),
            }),
        }
    }

    fn read(&self) -> SessionRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut SessionRecord)) {
        f(&mut self.record.write().unwrap_or_else(PoisonError::into_inner));
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Option<String> {
        self.read().access()
    }

    fn refresh(&self) -> Option<String> {
        self.read().refresh()
    }

    fn identity(&self) -> SessionIdentity {
        self.read().identity
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        self.update(|record| record.access = Some(access.to_string()));
        Ok(())
    }

    fn set_pair(&self, access: &str, refresh: &str) -> Result<(), StoreError> {
        self.update(|record| {
            record.access = Some(access.to_string());
            record.refresh = Some(refresh.to_string());
        });
        Ok(())
    }

    fn set_identity(&self, identity: SessionIdentity) -> Result<(), StoreError> {
        self.update(|record| record.identity = identity);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|record| *record = SessionRecord::default());
        Ok(())
    }
}

/// Token store persisted as a JSON file, surviving process restarts
///
/// Reads are served from memory. Every write updates memory first and then
/// rewrites the whole file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    record: RwLock<SessionRecord>,
}

impl FileTokenStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty session. An unreadable or malformed file is
    /// logged and also treated as an empty session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed session file");
                SessionRecord::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionRecord::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                SessionRecord::default()
            }
        };
        debug!(path = %path.display(), signed_in = record.access().is_some(), "session file opened");

        Self {
            path,
            record: RwLock::new(record),
        }
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SessionRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut SessionRecord)) -> Result<(), StoreError> {
        let mut record = self.record.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut record);
        self.persist(&record)
    }

    fn persist(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(record)?;
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, content).map_err(io_error)
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Option<String> {
        self.read().access()
    }

    fn refresh(&self) -> Option<String> {
        self.read().refresh()
    }

    fn identity(&self) -> SessionIdentity {
        self.read().identity
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        self.update(|record| record.access = Some(access.to_string()))
    }

    fn set_pair(&self, access: &str, refresh: &str) -> Result<(), StoreError> {
        self.update(|record| {
            record.access = Some(access.to_string());
            record.refresh = Some(refresh.to_string());
        })
    }

    fn set_identity(&self, identity: SessionIdentity) -> Result<(), StoreError> {
        self.update(|record| record.identity = identity)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|record| *record = SessionRecord::default())
    }
}
