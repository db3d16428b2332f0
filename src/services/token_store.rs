// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable storage for the access/refresh token pair.
//!
//! The store has no cache of its own: every read goes to the backing
//! [`KeyValueStorage`], and the pair is always written or removed in a
//! single storage operation so readers never observe half a pair being
//! replaced.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::models::TokenPair;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Minimal string key-value storage.
///
/// Multi-key writes and removals must be applied atomically.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set_many(&self, entries: &[(&str, &str)]);
    fn remove_many(&self, keys: &[&str]);
}

/// Process-local storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set_many(&self, items: &[(&str, &str)]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in items {
            entries.insert((*key).to_string(), (*value).to_string());
        }
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            entries.remove(*key);
        }
    }
}

/// Storage persisted as a flat JSON object on disk.
///
/// The file is loaded once when opened; afterwards the in-memory map is
/// authoritative and every mutation is written through. Writes go to a
/// sibling temp file that is renamed over the original.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Token file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read token file, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(e) = write_atomic(&self.path, entries) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist token file");
        }
    }
}

fn write_atomic(path: &Path, entries: &HashMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let json = serde_json::to_vec_pretty(entries)?;
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    restrict_permissions(&tmp_path)?;
    fs::rename(&tmp_path, path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set_many(&self, items: &[(&str, &str)]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in items {
            entries.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&entries);
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            entries.remove(*key);
        }
        self.persist(&entries);
    }
}

/// Single source of truth for the current token pair.
///
/// Cloning is cheap; all clones share the same storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store persisted to a JSON file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::open(path)))
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    /// Both tokens, or `None` if either half is missing.
    pub fn pair(&self) -> Option<TokenPair> {
        let access = self.get_access_token()?;
        let refresh = self.get_refresh_token()?;
        Some(TokenPair::new(access, refresh))
    }

    /// Overwrite both tokens.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, access_token),
            (REFRESH_TOKEN_KEY, refresh_token),
        ]);
    }

    pub fn store_pair(&self, pair: &TokenPair) {
        self.set_tokens(&pair.access_token, &pair.refresh_token);
    }

    /// Remove both tokens.
    pub fn clear_tokens(&self) {
        self.storage.remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY]);
    }
}
