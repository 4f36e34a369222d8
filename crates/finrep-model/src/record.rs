//! Tabular records and tab grouping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One row extracted from a report tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Tab (report section) the row came from.
    pub tab: String,
    /// Source row number, used for finding attribution.
    pub row: u32,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(tab: impl Into<String>, row: u32) -> Self {
        Self {
            tab: tab.into(),
            row,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field lookup; absent keys read as the blank value.
    pub fn value(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(Value::blank())
    }
}

/// Records grouped by tab. Within a tab, source order is preserved.
pub type RecordSet = HashMap<String, Vec<Record>>;

/// Group a flat record collection by tab identifier.
pub fn group_by_tab(records: Vec<Record>) -> RecordSet {
    let mut grouped: RecordSet = HashMap::new();
    for record in records {
        grouped.entry(record.tab.clone()).or_default().push(record);
    }
    grouped
}
