//! Request handler module
//!
//! Path resolution and the bundle handler that turns it into HTTP responses.

pub mod resolver;
pub mod static_bundle;

// Re-export main entry point
pub use static_bundle::{Outcome, Resolution, StaticBundle};
