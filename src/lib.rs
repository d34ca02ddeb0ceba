//! HTTP transport logging wrapper.
//!
//! Wraps any `tower::Service` that sends HTTP requests and logs every exchange
//! through a [`Logger`](observability::Logger): request line and headers,
//! response line and headers, and the size of every body chunk, all tagged with
//! a per-exchange correlation identifier. Headers, status, body bytes and errors
//! reach the caller exactly as the wrapped transport produced them.

pub mod config;
pub mod observability;
pub mod transport;

pub use config::Config;
pub use observability::{JsonLogger, Logger, TracingLogger};
pub use transport::{TransportLogging, TransportWrapper, WrapperConfig, WrapperError};
