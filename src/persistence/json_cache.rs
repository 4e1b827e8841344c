//! JSON file backed item cache
//!
//! Layout on disk: `<base>/<kind>/<network>.json`, one array per network.
//! Everything is loaded into memory when the cache is opened and a network's
//! file is rewritten whenever a new item for it is saved. Network names that
//! sanitize to the same file name share that file.

use super::memory_cache::MemoryItemCache;
use crate::domain::errors::CacheError;
use crate::domain::repositories::item_cache::{CacheItem, ItemCache};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

const JSON_FILE_EXTENSION: &str = "json";
const UNNAMED_NETWORK_FILE: &str = "unnamed";

pub struct JsonItemCache<T: CacheItem> {
    directory: PathBuf,
    memory: MemoryItemCache<T>,
    // Serializes file rewrites
    write_lock: Mutex<()>,
}

impl<T> JsonItemCache<T>
where
    T: CacheItem + Serialize + DeserializeOwned,
{
    /// Opens (creating if needed) the cache rooted at `base_path`.
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let directory = base_path.as_ref().join(T::kind());
        fs::create_dir_all(&directory).map_err(|source| CacheError::Io {
            path: directory.display().to_string(),
            source,
        })?;

        let mut items = Vec::new();
        let entries = fs::read_dir(&directory).map_err(|source| CacheError::Io {
            path: directory.display().to_string(),
            source,
        })?;

        for entry in entries {
            let path = entry
                .map_err(|source| CacheError::Io {
                    path: directory.display().to_string(),
                    source,
                })?
                .path();

            if path.extension().and_then(|e| e.to_str()) != Some(JSON_FILE_EXTENSION) {
                continue;
            }

            items.extend(Self::read_file(&path)?);
        }

        info!(
            "Opened {} cache at {} with {} items",
            T::kind(),
            directory.display(),
            items.len()
        );

        Ok(Self {
            directory,
            memory: MemoryItemCache::with_items(items),
            write_lock: Mutex::new(()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    fn file_for(&self, network_name: &str) -> PathBuf {
        let stem: String = network_name
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stem = if stem.is_empty() { UNNAMED_NETWORK_FILE.to_string() } else { stem };

        self.directory.join(format!("{}.{}", stem, JSON_FILE_EXTENSION))
    }

    fn read_file(path: &Path) -> Result<Vec<T>, CacheError> {
        let json = fs::read_to_string(path).map_err(|source| CacheError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&json).map_err(|source| CacheError::Serialization {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_network(&self, network_name: &str) -> Result<(), CacheError> {
        let path = self.file_for(network_name);
        let items: Vec<T> = self
            .memory
            .load_all()
            .into_iter()
            .filter(|item| self.file_for(item.network_name()) == path)
            .collect();

        let json = serde_json::to_string_pretty(&items).map_err(|source| {
            CacheError::Serialization {
                path: path.display().to_string(),
                source,
            }
        })?;

        fs::write(&path, json).map_err(|source| CacheError::Io {
            path: path.display().to_string(),
            source,
        })?;

        debug!("Wrote {} {} to {}", items.len(), T::kind(), path.display());
        Ok(())
    }
}

impl<T> ItemCache<T> for JsonItemCache<T>
where
    T: CacheItem + Serialize + DeserializeOwned,
{
    fn has_item(&self, network_name: &str, timestamp: DateTime<Utc>) -> bool {
        self.memory.has_item(network_name, timestamp)
    }

    fn save(&self, item: T) -> Result<bool, CacheError> {
        let _guard = self.write_lock.lock().map_err(|_| CacheError::LockPoisoned)?;

        let network_name = item.network_name().to_string();
        if !self.memory.save(item)? {
            return Ok(false);
        }

        self.write_network(&network_name)?;
        Ok(true)
    }

    fn load(&self, network_name: &str, timestamp: DateTime<Utc>) -> Option<T> {
        self.memory.load(network_name, timestamp)
    }

    fn load_at(&self, network_name: &str, timestamp: DateTime<Utc>) -> Vec<T> {
        self.memory.load_at(network_name, timestamp)
    }

    fn load_range(&self, network_name: &str) -> Vec<T> {
        self.memory.load_range(network_name)
    }

    fn load_all(&self) -> Vec<T> {
        self.memory.load_all()
    }
}
