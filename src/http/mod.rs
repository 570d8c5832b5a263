//! HTTP protocol layer module
//!
//! Content-Type detection and response building, decoupled from path resolution.

pub mod mime;
pub mod response;

// Re-export commonly used items
pub use mime::get_content_type;
pub use response::{build_404_response, build_file_response};
