//! In-memory logger for unit tests.

use std::sync::Mutex;

use crate::observability::{Field, Logger, Value};

/// One captured record, flattened to the fields the tests look at.
#[derive(Debug, Clone, Default)]
pub(crate) struct Record {
    pub v: u32,
    pub msg: String,
    pub id: Option<String>,
    pub n: Option<u64>,
    pub code: Option<u64>,
    pub complete: Option<bool>,
}

#[derive(Debug, Default)]
pub(crate) struct Recorder(Mutex<Vec<Record>>);

impl Recorder {
    pub fn records(&self) -> Vec<Record> {
        self.0.lock().unwrap().clone()
    }

    pub fn find(&self, msg: &str) -> Vec<Record> {
        self.records().into_iter().filter(|r| r.msg == msg).collect()
    }

    pub fn sum(&self, msg: &str) -> u64 {
        self.find(msg).iter().filter_map(|r| r.n).sum()
    }
}

impl Logger for Recorder {
    fn log(&self, v: u32, msg: &str, fields: &[Field<'_>]) {
        let mut record = Record {
            v,
            msg: msg.to_string(),
            ..Record::default()
        };
        for field in fields {
            match (field.key, field.value) {
                ("id", Value::Str(id)) => record.id = Some(id.to_string()),
                ("n", Value::Uint(n)) => record.n = Some(n),
                ("code", Value::Uint(code)) => record.code = Some(code),
                ("complete", Value::Bool(complete)) => record.complete = Some(complete),
                _ => {}
            }
        }
        self.0.lock().unwrap().push(record);
    }
}
