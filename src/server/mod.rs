// Server module entry point
// Listener setup, connection handling and graceful shutdown for the bundle server

pub mod connection;
pub mod listener;
pub mod mount;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
