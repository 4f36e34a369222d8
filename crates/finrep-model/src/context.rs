//! The shared read-only context assembled once per validation run.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FinrepError, Result};
use crate::record::Record;
use crate::value::Value;

/// Reporting-period bounds, normalized to calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_of_performance_end_date: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        period_of_performance_end_date: NaiveDate,
    ) -> Self {
        Self {
            start_date,
            end_date,
            period_of_performance_end_date,
        }
    }

    /// Inclusive containment in the reporting period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive containment in the period of performance.
    pub fn contains_performance(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.period_of_performance_end_date
    }
}

/// A prior reporting period's aggregate record, used by cumulative
/// cross-period checks. Current-period amounts live under `current_<field>`
/// keys alongside the filterable attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl PeriodSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attribute lookup; absent keys read as the blank value.
    pub fn attribute(&self, key: &str) -> &Value {
        self.attributes.get(key).unwrap_or(Value::blank())
    }

    /// This summary's current-period amount for a field.
    pub fn current_amount(&self, field: &str) -> f64 {
        self.attribute(&format!("current_{field}")).loose_number()
    }
}

/// Snapshot of externally loaded dropdown reference lists. Members are
/// stored lowercased; membership checks lowercase the probe to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownRegistry {
    lists: HashMap<String, BTreeSet<String>>,
}

impl DropdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_list<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = values
            .into_iter()
            .map(|value| value.as_ref().trim().to_lowercase())
            .collect();
        self.lists.insert(name.into(), members);
    }

    pub fn list(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.lists.get(name)
    }

    pub fn includes(&self, name: &str, value: &str) -> bool {
        self.list(name)
            .is_some_and(|members| members.contains(&value.trim().to_lowercase()))
    }
}

/// Immutable context passed to every check for the duration of a run.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// File-derived metadata, e.g. the project identifier parsed from the
    /// upload's filename.
    pub file_parts: HashMap<String, String>,
    pub reporting_period: ReportingPeriod,
    /// Valid subrecipients keyed by identifier.
    pub subrecipients: HashMap<String, Record>,
    /// Active rule tags for this run. Tagged rules apply only when they
    /// share a tag with this set.
    pub tags: BTreeSet<String>,
    pub period_summaries: Vec<PeriodSummary>,
    /// Dropdown snapshot; `None` means the registry was never loaded and
    /// dropdown checks fail closed.
    pub dropdowns: Option<DropdownRegistry>,
}

impl ValidationContext {
    pub fn builder(reporting_period: ReportingPeriod) -> ContextBuilder {
        ContextBuilder {
            file_parts: HashMap::new(),
            reporting_period,
            subrecipients: HashMap::new(),
            tags: BTreeSet::new(),
            period_summaries: Vec::new(),
            dropdowns: None,
        }
    }
}

/// Assembles a [`ValidationContext`], rejecting malformed period bounds.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    file_parts: HashMap<String, String>,
    reporting_period: ReportingPeriod,
    subrecipients: HashMap<String, Record>,
    tags: BTreeSet<String>,
    period_summaries: Vec<PeriodSummary>,
    dropdowns: Option<DropdownRegistry>,
}

impl ContextBuilder {
    pub fn file_part(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.file_parts.insert(key.into(), value.into());
        self
    }

    pub fn file_parts(mut self, parts: HashMap<String, String>) -> Self {
        self.file_parts = parts;
        self
    }

    pub fn subrecipients(mut self, subrecipients: HashMap<String, Record>) -> Self {
        self.subrecipients = subrecipients;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn period_summaries(mut self, summaries: Vec<PeriodSummary>) -> Self {
        self.period_summaries = summaries;
        self
    }

    pub fn dropdowns(mut self, registry: DropdownRegistry) -> Self {
        self.dropdowns = Some(registry);
        self
    }

    pub fn build(self) -> Result<ValidationContext> {
        if self.reporting_period.start_date > self.reporting_period.end_date {
            return Err(FinrepError::InvalidPeriod {
                start: self.reporting_period.start_date,
                end: self.reporting_period.end_date,
            });
        }
        Ok(ValidationContext {
            file_parts: self.file_parts,
            reporting_period: self.reporting_period,
            subrecipients: self.subrecipients,
            tags: self.tags,
            period_summaries: self.period_summaries,
            dropdowns: self.dropdowns,
        })
    }
}

/// Build the subrecipient lookup from the report's subrecipient records.
///
/// Keys on the identification number, falling back to the DUNS number;
/// records with neither are skipped. Later duplicates overwrite earlier
/// ones.
pub fn compute_subrecipient_lookup(records: &[Record]) -> HashMap<String, Record> {
    let mut lookup = HashMap::new();
    for record in records {
        let id = record.value("identification number");
        let key = if id.is_blank() {
            record.value("duns number")
        } else {
            id
        };
        if key.is_blank() {
            continue;
        }
        lookup.insert(key.display().trim().to_string(), record.clone());
    }
    lookup
}
