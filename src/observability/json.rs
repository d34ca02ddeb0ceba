//! JSON lines logger.
//!
//! Writes one JSON object per record:
//!
//! ```text
//! {"ts":1700000000.123,"v":15,"msg":"Sending request header","pid":4242,"id":"…","method":"GET",…}
//! ```
//!
//! Records above the configured maximum verbosity are discarded. Write
//! errors are ignored so that logging never interferes with the caller.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value as Json};

use crate::observability::logger::{redacted_headers, Field, Logger, Value};

/// A logger that writes JSON lines to any writer.
pub struct JsonLogger {
    writer: Mutex<Box<dyn Write + Send>>,
    max_v: u32,
    /// Fields added to every record, e.g. the process id.
    values: Map<String, Json>,
}

impl JsonLogger {
    /// Create a logger writing to `writer`, keeping records with `v <= max_v`.
    pub fn new(writer: impl Write + Send + 'static, max_v: u32) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            max_v,
            values: Map::new(),
        }
    }

    /// Logger writing to standard error.
    pub fn stderr(max_v: u32) -> Self {
        Self::new(io::stderr(), max_v)
    }

    /// Add a field that will be written with every record.
    pub fn with_value(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Wrap into the shared form the transport wrapper expects.
    pub fn into_shared(self) -> Arc<dyn Logger> {
        Arc::new(self)
    }

    fn render(&self, v: u32, msg: &str, fields: &[Field<'_>]) -> Map<String, Json> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();

        let mut record = Map::new();
        record.insert("ts".into(), Json::from(ts));
        record.insert("v".into(), Json::from(v));
        record.insert("msg".into(), Json::from(msg));
        for (key, value) in &self.values {
            record.insert(key.clone(), value.clone());
        }
        for field in fields {
            record.insert(field.key.to_string(), to_json(&field.value));
        }
        record
    }
}

fn to_json(value: &Value<'_>) -> Json {
    match value {
        Value::Str(s) => Json::from(*s),
        Value::Uint(n) => Json::from(*n),
        Value::Bool(b) => Json::from(*b),
        Value::Headers(headers) => {
            // Repeated headers are kept as a list, matching how they went over the wire.
            let mut map = Map::new();
            for (name, value) in redacted_headers(headers) {
                if let Json::Array(values) = map
                    .entry(name.to_string())
                    .or_insert_with(|| Json::Array(Vec::new()))
                {
                    values.push(Json::from(value));
                }
            }
            Json::Object(map)
        }
    }
}

impl Logger for JsonLogger {
    fn log(&self, v: u32, msg: &str, fields: &[Field<'_>]) {
        if v > self.max_v {
            return;
        }

        let mut line = match serde_json::to_vec(&self.render(v, msg, fields)) {
            Ok(line) => line,
            Err(_) => return,
        };
        line.push(b'\n');

        // A poisoned lock only means another writer panicked mid-record.
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writer.write_all(&line);
        let _ = writer.flush();
    }
}

impl std::fmt::Debug for JsonLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLogger")
            .field("max_v", &self.max_v)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
