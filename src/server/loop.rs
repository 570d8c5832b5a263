// Server loop module
// Accepts connections until shutdown, then drains the ones still in flight

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Interval between connection count checks while draining
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `signals` requests shutdown
///
/// After shutdown the listener is closed first, then active connections get
/// up to `write_timeout` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.wait() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(state.connection_count());

    let grace = Duration::from_secs(state.config.performance.write_timeout);
    if !drain_connections(&state, grace).await {
        logger::log_warning(&format!(
            "{} connections still active after {}s, closing",
            state.connection_count(),
            grace.as_secs()
        ));
    }

    logger::log_shutdown_complete();
}

/// Wait until no connections remain; `false` if `grace` ran out first
async fn drain_connections(state: &AppState, grace: Duration) -> bool {
    let wait_idle = async {
        while state.connection_count() > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(grace, wait_idle).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MemoryBundle;
    use crate::config::Config;
    use crate::handler::StaticBundle;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_state() -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist-servefs").unwrap();
        config.logging.access_log = false;
        config.performance.keep_alive_timeout = 0;
        config.performance.write_timeout = 1;

        let fs = MemoryBundle::new().with_file("site/index.html", "<p>hello</p>");
        let bundle = StaticBundle::new(Arc::new(fs), config.bundle.handler_config()).unwrap();
        Arc::new(AppState::new(config, bundle))
    }

    async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = test_state();
        let signals = Arc::new(SignalHandler::new());

        let server = tokio::spawn(start_server_loop(
            listener,
            Arc::clone(&state),
            Arc::clone(&signals),
        ));

        let response = raw_get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("content-type: text/html"));
        assert!(response.ends_with("<p>hello</p>"));

        let response = raw_get(addr, "/missing.css").await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found"));

        signals.trigger();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let state = test_state();
        state
            .active_connections
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        assert!(!drain_connections(&state, Duration::from_millis(120)).await);
    }
}
