//! Async key-value storage collaborators for durable snapshots.
//!
//! All operations are independently failable. Backends return boxed futures so
//! the store can hold any of them behind `Arc<dyn KeyValueStorage>`.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use futures_util::future::BoxFuture;
use thiserror::Error;

use hivecheck_utils::{atomic_write, recover_bak_file, remove_with_backup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Get,
    Set,
    Delete,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageOp::Get => "get",
            StorageOp::Set => "set",
            StorageOp::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage {op} failed for key {key}: {message}")]
    Io {
        op: StorageOp,
        key: String,
        message: String,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    fn io(op: StorageOp, key: &str, err: &io::Error) -> Self {
        StorageError::Io {
            op,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

pub trait KeyValueStorage: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>>;

    fn set<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, Result<(), StorageError>>;

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;
}

// ============================================================================
// File backend
// ============================================================================

/// One JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File that backs `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            let read = tokio::task::spawn_blocking(move || {
                recover_bak_file(&path);
                match std::fs::read(&path) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            read.map_err(|e| StorageError::io(StorageOp::Get, key, &e))
        })
    }

    fn set<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, Result<(), StorageError>> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        Box::pin(async move {
            let written = tokio::task::spawn_blocking(move || {
                std::fs::create_dir_all(&dir)?;
                atomic_write(&path, &bytes)
            })
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            written.map_err(|e| StorageError::io(StorageOp::Set, key, &e))
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        let path = self.path_for(key);
        Box::pin(async move {
            let removed = tokio::task::spawn_blocking(move || remove_with_backup(&path))
                .await
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            removed.map_err(|e| StorageError::io(StorageOp::Delete, key, &e))
        })
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Volatile storage. Failures can be switched on to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
    sets: AtomicUsize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    pub fn insert_raw(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(key.into(), bytes.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, op: StorageOp, key: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                op,
                key: key.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageError>> {
        let result = self
            .check(StorageOp::Get, key)
            .map(|()| self.lock().get(key).cloned());
        Box::pin(std::future::ready(result))
    }

    fn set<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> BoxFuture<'a, Result<(), StorageError>> {
        let result = self.check(StorageOp::Set, key).map(|()| {
            self.lock().insert(key.to_string(), bytes);
            self.sets.fetch_add(1, Ordering::SeqCst);
        });
        Box::pin(std::future::ready(result))
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        let result = self.check(StorageOp::Delete, key).map(|()| {
            self.lock().remove(key);
        });
        Box::pin(std::future::ready(result))
    }
}
