//! Per-tab rule catalogs (document-set validators).

use finrep_model::{Finding, RecordSet, ValidationContext};
use serde::{Deserialize, Serialize};

use crate::executor::validate_fields;
use crate::rule::Rule;

/// First data row beneath the header row.
const FIRST_DATA_ROW: u32 = 2;

/// How many records a tab is expected to carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Validate every record of the tab, in source order.
    AllRecords,
    /// Exactly one record is expected; any other count is itself a
    /// finding carrying this message.
    SingleRecord { missing_message: String },
}

/// The ordered rule catalog configured for one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabCatalog {
    pub tab: String,
    pub cardinality: Cardinality,
    pub rules: Vec<Rule>,
}

impl TabCatalog {
    pub fn all_records(tab: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            tab: tab.into(),
            cardinality: Cardinality::AllRecords,
            rules,
        }
    }

    pub fn single_record(
        tab: impl Into<String>,
        missing_message: impl Into<String>,
        rules: Vec<Rule>,
    ) -> Self {
        Self {
            tab: tab.into(),
            cardinality: Cardinality::SingleRecord {
                missing_message: missing_message.into(),
            },
            rules,
        }
    }

    /// Run this catalog against the grouped records. No truncation here;
    /// the orchestrator caps per-tab output.
    pub fn run(&self, records: &RecordSet, ctx: &ValidationContext) -> Vec<Finding> {
        let tab_records = records.get(&self.tab).map_or(&[][..], Vec::as_slice);
        match &self.cardinality {
            Cardinality::AllRecords => tab_records
                .iter()
                .flat_map(|record| validate_fields(&self.rules, record, record.row, ctx))
                .collect(),
            Cardinality::SingleRecord { missing_message } => {
                if tab_records.len() != 1 {
                    return vec![Finding::new(missing_message.as_str(), self.tab.as_str())];
                }
                validate_fields(&self.rules, &tab_records[0], FIRST_DATA_ROW, ctx)
            }
        }
    }
}
