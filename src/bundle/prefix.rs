//! Root namespace prefix
//!
//! Every bundled key shares one leading folder (bundlers usually wrap the
//! build output in a single generated directory). The prefix is fixed when the
//! handler is built, either from configuration or from the bundle's first
//! top-level entry.

use super::{VfsError, VirtualFs};
use thiserror::Error;

/// Errors raised while building a handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("invalid root prefix '{prefix}': {reason}")]
    InvalidRootPrefix { prefix: String, reason: &'static str },
}

/// How request paths map onto bundle keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RootPrefix {
    /// Detection failed; paths are used as keys unchanged
    #[default]
    Unresolved,
    /// Files sit at the top level of the bundle
    Flat,
    /// Every key starts with this folder
    Folder(String),
}

impl RootPrefix {
    /// Validate a prefix supplied by configuration
    ///
    /// An empty prefix selects a flat bundle: the request path minus its
    /// leading `/` is the key.
    pub fn explicit(prefix: &str) -> Result<Self, BundleError> {
        let invalid = |reason: &'static str| BundleError::InvalidRootPrefix {
            prefix: prefix.to_string(),
            reason,
        };

        if prefix.is_empty() {
            return Ok(Self::Flat);
        }
        if prefix.starts_with('/') {
            return Err(invalid("must not start with '/'"));
        }
        if prefix.ends_with('/') {
            return Err(invalid("must not end with '/'"));
        }
        for segment in prefix.split('/') {
            match segment {
                "" => return Err(invalid("contains an empty segment")),
                "." | ".." => return Err(invalid("contains a relative segment")),
                _ => {}
            }
        }

        Ok(Self::Folder(prefix.to_string()))
    }

    /// Take the leading segment of the first top-level entry
    pub fn detect(fs: &dyn VirtualFs) -> Result<Self, VfsError> {
        let entries = fs.top_level_entries()?;
        let first = entries.first().ok_or_else(|| VfsError::ListingFailed {
            reason: "bundle has no top-level entries".to_string(),
        })?;

        // split always yields at least one item
        let segment = first.split('/').next().unwrap_or_default();
        Ok(Self::Folder(segment.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Folder(prefix) => prefix.as_str(),
            Self::Unresolved | Self::Flat => "",
        }
    }

    /// Build a lookup key from a request path that starts with `/`
    pub fn key_for(&self, path: &str) -> String {
        match self {
            Self::Unresolved => path.to_string(),
            Self::Flat => path.strip_prefix('/').unwrap_or(path).to_string(),
            Self::Folder(prefix) => format!("{prefix}{path}"),
        }
    }
}
