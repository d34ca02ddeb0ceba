//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transport wrapper
//!     → logger.rs (Logger capability: level + message + fields)
//!     → json.rs (JSON lines to stderr or a file)
//!     → tracing.rs (events on the tracing subscriber)
//!
//! subscriber.rs installs the process-wide subscriber for the binary.
//! ```
//!
//! # Design Decisions
//! - Loggers own the verbosity gate; emitters always emit
//! - Sensitive headers are redacted by loggers, not by emitters
//! - Logging is best effort and never surfaces errors to callers

pub mod json;
pub mod logger;
pub mod subscriber;
pub mod tracing;

pub use self::json::JsonLogger;
pub use self::logger::{Field, Logger, Value};
pub use self::tracing::TracingLogger;
