//! `rust-embed` adapter
//!
//! Exposes assets compiled into the binary as a [`VirtualFs`]. The derive
//! keeps paths relative to its `#[folder]`, so point the folder one level above
//! the build output to keep the output directory as the root prefix.

use super::{VfsError, VirtualFs};
use hyper::body::Bytes;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::marker::PhantomData;

/// Bundle backed by a `#[derive(RustEmbed)]` type
pub struct EmbeddedBundle<E> {
    _assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedBundle<E> {
    pub const fn new() -> Self {
        Self {
            _assets: PhantomData,
        }
    }
}

impl<E: RustEmbed> Default for EmbeddedBundle<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> VirtualFs for EmbeddedBundle<E> {
    fn top_level_entries(&self) -> Result<Vec<String>, VfsError> {
        let mut entries: Vec<String> = Vec::new();
        for path in E::iter() {
            let top = path.split('/').next().unwrap_or_default();
            if !entries.iter().any(|e| e == top) {
                entries.push(top.to_string());
            }
        }
        Ok(entries)
    }

    fn read(&self, key: &str) -> Result<Bytes, VfsError> {
        let file = E::get(key).ok_or_else(|| VfsError::not_found(key))?;
        Ok(match file.data {
            Cow::Borrowed(data) => Bytes::from_static(data),
            Cow::Owned(data) => Bytes::from(data),
        })
    }
}
