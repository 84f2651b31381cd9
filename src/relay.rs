//! Cross-origin image relay.
//!
//! Remote images drawn straight onto the canvas would taint it and block
//! export. The relay re-serves them from a local HTTP server with a permissive
//! `Access-Control-Allow-Origin`, so the loader can mark the bytes readable.
//!
//! ## Architecture
//!
//! [`RelayServer`] binds a `tiny_http` server and answers on a background
//! thread until dropped:
//! - `GET /image-proxy?url=<percent-encoded>` - upstream bytes with CORS headers
//! - anything else - 404

use crate::constants::RELAY_CACHE_CONTROL;
use crate::error::{Error, Result};
use crate::loader::Fetch;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, error, warn};

/// Path the relay answers on
pub const RELAY_PATH: &str = "/image-proxy";

/// Build the relay URL that re-serves `external` through `endpoint`.
pub fn relay_url(endpoint: &str, external: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}url={}", endpoint, separator, urlencoding::encode(external))
}

/// Extract the decoded `url` parameter from a relay request path.
pub fn parse_relay_request(request_url: &str) -> Option<String> {
    let (path, query) = request_url.split_once('?')?;
    if path != RELAY_PATH {
        return None;
    }

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "url")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Helper to create HTTP headers, returning None if the bytes are invalid
fn create_header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Local HTTP relay serving remote images with readback-friendly headers.
pub struct RelayServer {
    addr: SocketAddr,
    shutdown_flag: Arc<AtomicBool>,
    server_thread: Option<JoinHandle<()>>,
}

impl RelayServer {
    /// Bind `addr` (use port 0 for an ephemeral port) and start serving.
    pub fn start(addr: &str, upstream: Arc<dyn Fetch>) -> Result<Self> {
        let server = Server::http(addr).map_err(|e| Error::Fetch(format!("Failed to bind relay on {}: {}", addr, e)))?;
        let bound = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| Error::Fetch(format!("Relay on {} has no IP address", addr)))?;

        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let shutdown_flag_clone = Arc::clone(&shutdown_flag);

        let server_thread = thread::Builder::new()
            .name("overlay-relay".to_string())
            .spawn(move || {
                loop {
                    if shutdown_flag_clone.load(Ordering::Relaxed) {
                        break;
                    }

                    match server.recv_timeout(Duration::from_millis(100)) {
                        Ok(Some(request)) => Self::handle(request, upstream.as_ref()),
                        Ok(None) => {}
                        Err(e) => {
                            error!("Relay server stopped: {}", e);
                            break;
                        }
                    }
                }
            })?;

        debug!(addr = %bound, "Relay listening");
        Ok(Self {
            addr: bound,
            shutdown_flag,
            server_thread: Some(server_thread),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Endpoint to configure as the loader's relay.
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, RELAY_PATH)
    }

    fn handle(request: Request, upstream: &dyn Fetch) {
        let request_url = request.url().to_string();

        let path = request_url.split_once('?').map_or(request_url.as_str(), |(path, _)| path);
        if path != RELAY_PATH {
            let _ = request.respond(Self::json_response(404, "Not found"));
            return;
        }

        let Some(target) = parse_relay_request(&request_url) else {
            let _ = request.respond(Self::json_response(400, "Missing URL"));
            return;
        };

        match upstream.fetch(&target) {
            Ok(fetched) => {
                let content_type = fetched.content_type.as_deref().unwrap_or("image/png");
                let mut response = Response::from_data(fetched.bytes);
                for (name, value) in [
                    ("Content-Type", content_type),
                    ("Cache-Control", RELAY_CACHE_CONTROL),
                    ("Access-Control-Allow-Origin", "*"),
                ] {
                    if let Some(header) = create_header(name, value) {
                        response = response.with_header(header);
                    }
                }
                let _ = request.respond(response);
            }
            Err(e) => {
                warn!(url = %target, "Relay upstream failed: {}", e);
                let _ = request.respond(Self::json_response(500, "Failed to fetch image"));
            }
        }
    }

    fn json_response(status: u16, message: &str) -> Response<std::io::Cursor<Vec<u8>>> {
        let body = serde_json::json!({ "error": message }).to_string();
        let mut response = Response::from_string(body).with_status_code(StatusCode(status));
        if let Some(header) = create_header("Content-Type", "application/json") {
            response = response.with_header(header);
        }
        response
    }
}

impl Drop for RelayServer {
    fn drop(&mut self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.server_thread.take() {
            let _ = handle.join();
        }
    }
}
