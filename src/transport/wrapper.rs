//! Transport wrapper configuration and construction.
//!
//! ```ignore
//! let wrapper = TransportWrapper::builder()
//!     .logger(logger)
//!     .header_v(15)
//!     .body_v(16)
//!     .build()?;
//! let transport = wrapper.wrap(client);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::Layer;

use crate::observability::Logger;
use crate::transport::exchange::Levels;
use crate::transport::service::TransportLogging;

/// Default verbosity of request/response header records.
pub const DEFAULT_HEADER_V: i64 = 1;

/// Default verbosity of body chunk records.
pub const DEFAULT_BODY_V: i64 = 2;

/// Error building a [`TransportWrapper`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WrapperError {
    #[error("logger is mandatory")]
    MissingLogger,

    #[error("{field} verbosity level {value} isn't valid, it must be greater than or equal to 0")]
    NegativeVerbosity { field: &'static str, value: i64 },

    #[error("{field} verbosity level {value} is too large")]
    VerbosityOverflow { field: &'static str, value: i64 },
}

/// Verbosity levels of the wrapper, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Level of "Sending request header" and "Received response header" records.
    pub header_v: i64,

    /// Level of body chunk and body summary records.
    pub body_v: i64,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            header_v: DEFAULT_HEADER_V,
            body_v: DEFAULT_BODY_V,
        }
    }
}

/// Check a configured level and convert it to the logger's representation.
pub fn check_level(field: &'static str, value: i64) -> Result<u32, WrapperError> {
    if value < 0 {
        return Err(WrapperError::NegativeVerbosity { field, value });
    }
    u32::try_from(value).map_err(|_| WrapperError::VerbosityOverflow { field, value })
}

/// Collects the settings of a [`TransportWrapper`].
#[derive(Debug, Default, Clone)]
pub struct TransportWrapperBuilder {
    logger: Option<Arc<dyn Logger>>,
    config: WrapperConfig,
}

impl TransportWrapperBuilder {
    /// Logger that receives the records. Mandatory.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Level used for header records. Defaults to 1.
    pub fn header_v(mut self, value: i64) -> Self {
        self.config.header_v = value;
        self
    }

    /// Level used for body records. Defaults to 2.
    pub fn body_v(mut self, value: i64) -> Self {
        self.config.body_v = value;
        self
    }

    /// Take both levels from a configuration value.
    pub fn config(mut self, config: WrapperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<TransportWrapper, WrapperError> {
        let logger = self.logger.ok_or(WrapperError::MissingLogger)?;
        let header_v = check_level("header", self.config.header_v)?;
        let body_v = check_level("body", self.config.body_v)?;

        Ok(TransportWrapper {
            levels: Levels {
                logger,
                header_v,
                body_v,
            },
        })
    }
}

/// Immutable factory of logging transports.
///
/// Also usable as a `tower::Layer`.
#[derive(Debug, Clone)]
pub struct TransportWrapper {
    levels: Levels,
}

impl TransportWrapper {
    pub fn builder() -> TransportWrapperBuilder {
        TransportWrapperBuilder::default()
    }

    /// Wrap a transport so that its exchanges are logged.
    pub fn wrap<S>(&self, transport: S) -> TransportLogging<S> {
        TransportLogging::new(transport, self.levels.clone())
    }

    pub fn header_v(&self) -> u32 {
        self.levels.header_v
    }

    pub fn body_v(&self) -> u32 {
        self.levels.body_v
    }
}

impl<S> Layer<S> for TransportWrapper {
    type Service = TransportLogging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        self.wrap(inner)
    }
}
