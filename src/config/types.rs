// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub bundle: BundleConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// URL prefix the bundle is exposed under (default: /)
    pub mount_path: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `debug` also reports every bundle lookup miss
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl LoggingConfig {
    pub fn is_debug(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug")
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Bundle source and handler settings
#[derive(Debug, Deserialize, Clone)]
pub struct BundleConfig {
    /// Directory snapshotted into memory at startup
    pub dir: String,
    pub use_client_side_router: bool,
    pub main_path: String,
    #[serde(default)]
    pub root_prefix: Option<String>,
}

impl BundleConfig {
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            use_client_side_router: self.use_client_side_router,
            main_path: self.main_path.clone(),
            root_prefix: self.root_prefix.clone(),
        }
    }
}

/// Settings of a single bundle handler, immutable once the handler is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Serve `main_path` for paths that match no bundled file
    pub use_client_side_router: bool,
    /// Fallback document, relative to the root prefix (e.g. `/index.html`)
    pub main_path: String,
    /// Explicit root prefix; detected from the bundle when absent
    pub root_prefix: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_main_path() -> String {
    "/index.html".to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            use_client_side_router: false,
            main_path: default_main_path(),
            root_prefix: None,
        }
    }
}

impl HandlerConfig {
    /// Enable the single-page-app fallback to `main_path`
    #[must_use]
    pub fn with_client_side_router(mut self, main_path: impl Into<String>) -> Self {
        self.use_client_side_router = true;
        self.main_path = main_path.into();
        self
    }

    #[must_use]
    pub fn with_root_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.root_prefix = Some(prefix.into());
        self
    }
}
