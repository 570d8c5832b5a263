//! Serve an in-memory asset bundle over HTTP.
//!
//! Request paths resolve against a read-only [`bundle::VirtualFs`]; a path
//! ending in `/` serves that directory's `index.html`, and with the client-side
//! router enabled any miss falls back to one main document so single-page apps
//! can route on the client.
//!
//! ```
//! use std::sync::Arc;
//! use servefs::bundle::MemoryBundle;
//! use servefs::{HandlerConfig, Outcome, StaticBundle};
//!
//! let fs = MemoryBundle::new().with_file("dist/index.html", "<div id=app></div>");
//! let config = HandlerConfig::default().with_client_side_router("/index.html");
//! let handler = StaticBundle::new(Arc::new(fs), config).unwrap();
//!
//! assert_eq!(handler.resolve("/").outcome(), Outcome::ServeDirect);
//! assert_eq!(handler.resolve("/users/42").outcome(), Outcome::ServeFallback);
//! ```

pub mod bundle;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::HandlerConfig;
pub use handler::{Outcome, Resolution, StaticBundle};
