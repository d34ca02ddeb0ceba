//! Logger capability consumed by the transport wrapper.
//!
//! # Responsibilities
//! - Define the `Logger` trait: a verbosity level, a message, and ordered fields
//! - Define the field values the wrapper emits
//! - Provide header redaction shared by logger implementations
//!
//! # Design Decisions
//! - Logging never fails from the caller's point of view (`log` returns `()`)
//! - The logger decides whether a level is enabled, callers always emit
//! - Fields borrow from the caller, nothing is allocated until a logger writes

use std::fmt;

use hyper::header::{HeaderName, AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, SET_COOKIE};
use hyper::HeaderMap;

/// A structured logger that accepts a verbosity level and key/value fields.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Emit one record at verbosity `v`.
    ///
    /// Implementations attach `v` to the record themselves and may drop the
    /// record if `v` is above what they are configured to write.
    fn log(&self, v: u32, msg: &str, fields: &[Field<'_>]);
}

/// One key/value pair of a log record.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub key: &'static str,
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    pub fn new(key: &'static str, value: impl Into<Value<'a>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Value of a log field.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Str(&'a str),
    Uint(u64),
    Bool(bool),
    Headers(&'a HeaderMap),
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Str(value.as_str())
    }
}

impl From<u64> for Value<'_> {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<u16> for Value<'_> {
    fn from(value: u16) -> Self {
        Value::Uint(u64::from(value))
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<'a> From<&'a HeaderMap> for Value<'a> {
    fn from(value: &'a HeaderMap) -> Self {
        Value::Headers(value)
    }
}

/// Placeholder written instead of sensitive header values.
pub const REDACTED: &str = "***";

/// Headers whose values never reach the log.
const SENSITIVE_HEADERS: [HeaderName; 4] = [AUTHORIZATION, PROXY_AUTHORIZATION, COOKIE, SET_COOKIE];

/// Returns true if the values of this header must be redacted.
pub fn is_sensitive(name: &HeaderName) -> bool {
    SENSITIVE_HEADERS.contains(name)
}

/// Iterate headers as `(name, value)` strings with sensitive values redacted.
///
/// Values that aren't valid visible ASCII are rendered lossily.
pub fn redacted_headers(headers: &HeaderMap) -> impl Iterator<Item = (&str, String)> {
    headers.iter().map(|(name, value)| {
        let rendered = if is_sensitive(name) {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        (name.as_str(), rendered)
    })
}
