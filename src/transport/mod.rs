//! Transport logging subsystem.
//!
//! # Data Flow
//! ```text
//! caller Request
//!     → service.rs (new Exchange, log request header)
//!     → body.rs (request body counted as the transport drains it)
//!     → inner transport (hyper client or any tower::Service)
//!     → service.rs (log response header)
//!     → body.rs (response body counted as the caller drains it)
//!     → caller Response
//! ```
//!
//! # Design Decisions
//! - Wrapping never changes headers, status, body bytes or errors
//! - One exchange context per call, shared by every record of that call
//! - Bodies are streamed through, never buffered
//! - wrapper.rs validates levels once; the resulting wrapper is immutable

pub mod body;
pub mod client;
pub mod exchange;
pub mod service;
pub mod wrapper;

#[cfg(test)]
mod test_support;

pub use body::CountingBody;
pub use client::{http_client, logged_client, LoggedClient};
pub use exchange::{Direction, Exchange, ExchangeId, Phase};
pub use service::{ResponseFuture, TransportLogging};
pub use wrapper::{TransportWrapper, TransportWrapperBuilder, WrapperConfig, WrapperError};
