// Configuration module entry point
// Loads layered configuration and holds the shared server state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    BundleConfig, Config, HandlerConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "servefs";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Environment variables `SERVEFS_<SECTION>__<KEY>` override the file
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVEFS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.mount_path", "/")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("bundle.dir", "dist")?
            .set_default("bundle.use_client_side_router", false)?
            .set_default("bundle.main_path", "/index.html")?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Check values that deserialize fine but cannot be served
    pub fn validate(&self) -> Result<(), String> {
        if !self.server.mount_path.starts_with('/') {
            return Err(format!(
                "server.mount_path must start with '/': '{}'",
                self.server.mount_path
            ));
        }
        if !self.bundle.main_path.starts_with('/') {
            return Err(format!(
                "bundle.main_path must start with '/': '{}'",
                self.bundle.main_path
            ));
        }
        if self.server.workers == Some(0) {
            return Err("server.workers must be at least 1".to_string());
        }
        Ok(())
    }
}
