//! In-memory bundle
//!
//! A sorted key-to-bytes map. Can be assembled by hand or snapshotted from a
//! directory at startup.

use super::{VfsError, VirtualFs};
use hyper::body::Bytes;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors raised while snapshotting a directory
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("path is not valid UTF-8: '{}'", .0.display())]
    NonUtf8Path(PathBuf),
}

impl LoadError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read-only bundle held entirely in memory
///
/// Top-level entries enumerate in sorted order, so prefix detection is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    files: BTreeMap<String, Bytes>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(key, data);
        self
    }

    /// Add or replace a file. A leading `/` on the key is dropped.
    pub fn insert(&mut self, key: impl Into<String>, data: impl Into<Bytes>) {
        let key = key.into();
        let key = key.trim_start_matches('/').to_string();
        self.files.insert(key, data.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all stored files in bytes
    pub fn total_bytes(&self) -> usize {
        self.files.values().map(Bytes::len).sum()
    }

    /// Snapshot a directory tree into memory
    ///
    /// Files are stored under a top-level folder named after the directory, so
    /// `dist/assets/app.js` on disk becomes the key `dist/assets/app.js`
    /// regardless of the current working directory.
    pub async fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let root = fs::canonicalize(dir)
            .await
            .map_err(|e| LoadError::io(dir, e))?;
        let metadata = fs::metadata(&root)
            .await
            .map_err(|e| LoadError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_path_buf()));
        }

        let root_name = match root.file_name() {
            Some(name) => name
                .to_str()
                .ok_or_else(|| LoadError::NonUtf8Path(root.clone()))?
                .to_string(),
            // Filesystem root has no name, keep keys unprefixed
            None => String::new(),
        };

        let mut bundle = Self::new();
        let mut pending = vec![(root.clone(), root_name)];

        while let Some((current, key_prefix)) = pending.pop() {
            let mut entries = fs::read_dir(&current)
                .await
                .map_err(|e| LoadError::io(&current, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| LoadError::io(&current, e))?
            {
                let path = entry.path();
                let name = entry
                    .file_name()
                    .into_string()
                    .map_err(|_| LoadError::NonUtf8Path(path.clone()))?;
                let key = if key_prefix.is_empty() {
                    name
                } else {
                    format!("{key_prefix}/{name}")
                };

                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| LoadError::io(&path, e))?;
                if file_type.is_dir() {
                    pending.push((path, key));
                } else {
                    // Symlinks are followed by fs::read
                    let data = fs::read(&path).await.map_err(|e| LoadError::io(&path, e))?;
                    bundle.insert(key, data);
                }
            }
        }

        Ok(bundle)
    }
}

impl VirtualFs for MemoryBundle {
    fn top_level_entries(&self) -> Result<Vec<String>, VfsError> {
        let mut entries: Vec<String> = Vec::new();
        for key in self.files.keys() {
            let top = key.split('/').next().unwrap_or_default();
            // Keys are sorted, so duplicates are adjacent
            if entries.last().map(String::as_str) != Some(top) {
                entries.push(top.to_string());
            }
        }
        Ok(entries)
    }

    fn read(&self, key: &str) -> Result<Bytes, VfsError> {
        self.files
            .get(key)
            .cloned()
            .ok_or_else(|| VfsError::not_found(key))
    }
}
