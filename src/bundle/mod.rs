//! Virtual filesystem module
//!
//! The handler never touches a real filesystem. It reads assets through the
//! [`VirtualFs`] capability, which any read-only key-to-bytes store can implement:
//! - [`MemoryBundle`] keeps files in a sorted in-memory map
//! - [`EmbeddedBundle`] wraps assets compiled in with `rust-embed`

mod embedded;
mod memory;
mod prefix;

pub use embedded::EmbeddedBundle;
pub use memory::{LoadError, MemoryBundle};
pub use prefix::{BundleError, RootPrefix};

use hyper::body::Bytes;
use thiserror::Error;

/// Failures raised by a virtual filesystem
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// Requested key is absent
    #[error("entry not found: {key}")]
    NotFound { key: String },
    /// Top-level enumeration failed or produced nothing usable
    #[error("top-level listing failed: {reason}")]
    ListingFailed { reason: String },
}

impl VfsError {
    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }
}

/// Read-only file lookup capability
///
/// Keys are `/`-separated and carry no leading slash, e.g. `dist/index.html`.
/// Implementations must be safe to share between any number of concurrent readers.
pub trait VirtualFs: Send + Sync {
    /// Names of the top-level entries, in enumeration order
    fn top_level_entries(&self) -> Result<Vec<String>, VfsError>;

    /// Full contents of the file stored under `key`
    fn read(&self, key: &str) -> Result<Bytes, VfsError>;
}
