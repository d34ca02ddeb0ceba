//! Exchange context: one per request/response pair.
//!
//! # Responsibilities
//! - Generate the correlation identifier shared by all records of an exchange
//! - Emit header, body chunk and summary records at the configured levels
//! - Track the exchange phase (Started → HeaderLogged → BodyStreaming → Completed)
//!
//! The context is shared through an `Arc` by the response future and both body
//! wrappers. It is discarded when the last of them is dropped, which is when the
//! call has returned and every body has been drained or dropped.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use hyper::{HeaderMap, Method, Response, StatusCode, Uri, Version};
use uuid::Uuid;

use crate::observability::{Field, Logger};

/// Correlation identifier of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExchangeId(String);

impl ExchangeId {
    /// Generate a new unique exchange ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phase of an exchange. Transitions only move forward.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Started = 0,
    HeaderLogged = 1,
    BodyStreaming = 2,
    Completed = 3,
}

impl From<u8> for Phase {
    fn from(val: u8) -> Self {
        match val {
            0 => Phase::Started,
            1 => Phase::HeaderLogged,
            2 => Phase::BodyStreaming,
            _ => Phase::Completed,
        }
    }
}

/// Which side of the exchange a body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    fn chunk_message(self) -> &'static str {
        match self {
            Direction::Request => "Sending request body",
            Direction::Response => "Received response body",
        }
    }

    fn summary_message(self) -> &'static str {
        match self {
            Direction::Request => "Finished sending request body",
            Direction::Response => "Finished receiving response body",
        }
    }
}

/// Settings an exchange logs with, copied from the wrapper.
#[derive(Debug, Clone)]
pub(crate) struct Levels {
    pub logger: Arc<dyn Logger>,
    pub header_v: u32,
    pub body_v: u32,
}

/// State of a single request/response exchange.
#[derive(Debug)]
pub struct Exchange {
    id: ExchangeId,
    levels: Levels,
    started: Instant,
    phase: AtomicU8,
}

impl Exchange {
    pub(crate) fn start(levels: Levels) -> Self {
        Self {
            id: ExchangeId::new(),
            levels,
            started: Instant::now(),
            phase: AtomicU8::new(Phase::Started as u8),
        }
    }

    pub fn id(&self) -> &ExchangeId {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        Phase::from(self.phase.load(Ordering::Acquire))
    }

    /// Move to `phase` unless the exchange is already past it.
    pub(crate) fn advance(&self, phase: Phase) {
        self.phase.fetch_max(phase as u8, Ordering::AcqRel);
    }

    pub(crate) fn log_request_header(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
        let url = uri.to_string();
        self.levels.logger.log(
            self.levels.header_v,
            "Sending request header",
            &[
                Field::new("id", self.id.as_str()),
                Field::new("method", method.as_str()),
                Field::new("url", &url),
                Field::new("header", headers),
            ],
        );
        self.advance(Phase::HeaderLogged);
    }

    pub(crate) fn log_response_header<B>(&self, response: &Response<B>) {
        let protocol = protocol(response.version());
        let status = status_line(response.status());
        self.levels.logger.log(
            self.levels.header_v,
            "Received response header",
            &[
                Field::new("id", self.id.as_str()),
                Field::new("protocol", protocol),
                Field::new("status", &status),
                Field::new("code", response.status().as_u16()),
                Field::new("header", response.headers()),
            ],
        );
    }

    pub(crate) fn log_chunk(&self, direction: Direction, n: u64) {
        self.advance(Phase::BodyStreaming);
        self.levels.logger.log(
            self.levels.body_v,
            direction.chunk_message(),
            &[Field::new("id", self.id.as_str()), Field::new("n", n)],
        );
    }

    pub(crate) fn log_summary(&self, direction: Direction, total: u64, complete: bool) {
        self.levels.logger.log(
            self.levels.body_v,
            direction.summary_message(),
            &[
                Field::new("id", self.id.as_str()),
                Field::new("total", total),
                Field::new("complete", complete),
            ],
        );
    }
}

impl Drop for Exchange {
    fn drop(&mut self) {
        self.advance(Phase::Completed);
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.levels.logger.log(
            self.levels.header_v,
            "Exchange completed",
            &[
                Field::new("id", self.id.as_str()),
                Field::new("elapsed_ms", elapsed_ms),
            ],
        );
    }
}

/// Protocol string as written on a status line, e.g. `HTTP/1.1`.
pub fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
}

/// Human readable status, e.g. `200 OK`. Unknown codes render as the bare number.
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
