//! Logger backed by `tracing` events.
//!
//! Records become events on the `wirelog::transport` target. Verbosity 0 maps
//! to INFO, 1 to 4 to DEBUG, anything higher to TRACE, so the usual
//! `RUST_LOG` filters apply on top of the logger's own `max_v`.

use std::fmt;

use tracing::Level;

use crate::observability::logger::{redacted_headers, Field, Logger, Value};

/// A logger that forwards records to the `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    max_v: u32,
}

impl TracingLogger {
    pub fn new(max_v: u32) -> Self {
        Self { max_v }
    }

    /// Level a record with verbosity `v` is emitted at.
    pub fn level_for(v: u32) -> Level {
        match v {
            0 => Level::INFO,
            1..=4 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Renders fields as `key=value` pairs separated by spaces.
struct DisplayFields<'a, 'b>(&'a [Field<'b>]);

impl fmt::Display for DisplayFields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=", field.key)?;
            match field.value {
                Value::Str(s) => write!(f, "{:?}", s)?,
                Value::Uint(n) => write!(f, "{}", n)?,
                Value::Bool(b) => write!(f, "{}", b)?,
                Value::Headers(headers) => {
                    f.write_str("{")?;
                    for (j, (name, value)) in redacted_headers(headers).enumerate() {
                        if j > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}: {:?}", name, value)?;
                    }
                    f.write_str("}")?;
                }
            }
        }
        Ok(())
    }
}

impl Logger for TracingLogger {
    fn log(&self, v: u32, msg: &str, fields: &[Field<'_>]) {
        if v > self.max_v {
            return;
        }
        let fields = DisplayFields(fields);
        // `tracing` needs the level at compile time, so this mirrors `level_for`.
        match v {
            0 => tracing::info!(target: "wirelog::transport", v, fields = %fields, "{}", msg),
            1..=4 => tracing::debug!(target: "wirelog::transport", v, fields = %fields, "{}", msg),
            _ => tracing::trace!(target: "wirelog::transport", v, fields = %fields, "{}", msg),
        }
    }
}
