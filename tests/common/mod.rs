//! Shared utilities for integration tests.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{body::Bytes, routing::any, Router};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use wirelog::transport::{logged_client, LoggedClient};
use wirelog::{JsonLogger, TransportWrapper};

/// Start a server on an ephemeral port that answers every request under
/// `/my-path` with `response` and returns its address.
pub async fn start_server(response: &'static [u8]) -> SocketAddr {
    let app = Router::new().route("/my-path", any(move |_body: Bytes| async move { response }));
    serve(app).await
}

/// Start a server that answers with the request body it received.
#[allow(dead_code)]
pub async fn start_echo_server() -> SocketAddr {
    let app = Router::new().route("/my-path", any(|body: Bytes| async move { body }));
    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// In-memory log sink that can be cloned into a logger.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    /// Every JSON record written so far.
    pub fn parse(&self) -> Vec<Map<String, Value>> {
        let data = self.0.lock().unwrap();
        String::from_utf8_lossy(&data)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

/// Records whose `msg` equals `msg`.
pub fn find(messages: &[Map<String, Value>], msg: &str) -> Vec<Map<String, Value>> {
    messages
        .iter()
        .filter(|m| m.get("msg").and_then(Value::as_str) == Some(msg))
        .cloned()
        .collect()
}

/// Sum of the `n` fields of the given records.
pub fn total(messages: &[Map<String, Value>]) -> u64 {
    messages
        .iter()
        .map(|m| m["n"].as_u64().expect("n must be a non-negative integer"))
        .sum()
}

/// A client logging everything into `buffer` with header level 15 and body level 16.
pub fn client(buffer: &SharedBuffer) -> LoggedClient {
    let logger = JsonLogger::new(buffer.clone(), u32::MAX).into_shared();
    let wrapper = TransportWrapper::builder()
        .logger(logger)
        .header_v(15)
        .body_v(16)
        .build()
        .unwrap();
    logged_client(&wrapper)
}
