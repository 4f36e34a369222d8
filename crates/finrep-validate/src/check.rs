//! Declarative field checks.
//!
//! Checks are data, not closures: every parameterized check carries its
//! bound key or nested check as a variant payload, so rule catalogs can
//! be serialized and inspected. Evaluation is total: malformed input
//! fails the check (or vacuously passes a conditional wrapper), it never
//! panics.

use finrep_model::{PeriodSummary, Record, ValidationContext, Value, cents};
use serde::{Deserialize, Serialize};

use crate::dates::parse_date;

/// Attribute-equality filter over prior-period summaries. A summary
/// matches when every listed attribute equals its expectation after
/// trimming, case-insensitively. An empty filter matches every summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryFilter(pub Vec<(String, String)>);

impl SummaryFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn equals(attribute: impl Into<String>, expected: impl Into<String>) -> Self {
        Self(vec![(attribute.into(), expected.into())])
    }

    pub fn and(mut self, attribute: impl Into<String>, expected: impl Into<String>) -> Self {
        self.0.push((attribute.into(), expected.into()));
        self
    }

    pub fn matches(&self, summary: &PeriodSummary) -> bool {
        self.0.iter().all(|(attribute, expected)| {
            summary
                .attribute(attribute)
                .display()
                .trim()
                .eq_ignore_ascii_case(expected.trim())
        })
    }
}

/// A single field check. Atomic variants test the field's value; the
/// `When*` wrappers gate an inner check on another field's state and pass
/// vacuously when the condition does not hold. Wrappers nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Numeric, or non-empty after trimming.
    NotBlank,
    /// Numeric and strictly positive.
    PositiveNumber,
    /// Numeric and at least $50,000.
    AtLeast50K,
    /// Coerces to a valid calendar date.
    ValidDate,
    /// Present in the context's subrecipient lookup.
    ValidSubrecipient,
    /// Date within the reporting period, inclusive.
    InReportingPeriod,
    /// Date within the period of performance, inclusive.
    InPeriodOfPerformance,
    /// Loosely equals another field's amount, within a cent.
    Equal { other: String },
    /// Equals the sum of the named columns, compared in cents. Empty
    /// column names are skipped.
    Sum { columns: Vec<String> },
    /// Equals the cumulative amount: prior periods' `current_<field>`
    /// over matching summaries, plus this record's own field.
    CumulativeEqual {
        field: String,
        #[serde(default)]
        filter: SummaryFilter,
    },
    /// Matches a file-derived metadata part, ignoring leading zeros on
    /// either side.
    MatchesFilePart { part: String },
    /// Both this value and the other field must be numeric.
    LessOrEqual { other: String },
    /// Both this value and the other field must be numeric.
    GreaterOrEqual { other: String },
    /// Member of an externally loaded dropdown list. Fails closed when
    /// the registry snapshot is uninitialized.
    DropdownIncludes { list: String },
    WhenBlank { key: String, inner: Box<Check> },
    WhenNotBlank { key: String, inner: Box<Check> },
    WhenUs { key: String, inner: Box<Check> },
    WhenPositive { key: String, inner: Box<Check> },
}

impl Check {
    pub fn equal(other: impl Into<String>) -> Self {
        Check::Equal {
            other: other.into(),
        }
    }

    pub fn sum<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::Sum {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cumulative_equal(field: impl Into<String>, filter: SummaryFilter) -> Self {
        Check::CumulativeEqual {
            field: field.into(),
            filter,
        }
    }

    pub fn matches_file_part(part: impl Into<String>) -> Self {
        Check::MatchesFilePart { part: part.into() }
    }

    pub fn less_or_equal(other: impl Into<String>) -> Self {
        Check::LessOrEqual {
            other: other.into(),
        }
    }

    pub fn greater_or_equal(other: impl Into<String>) -> Self {
        Check::GreaterOrEqual {
            other: other.into(),
        }
    }

    pub fn dropdown_includes(list: impl Into<String>) -> Self {
        Check::DropdownIncludes { list: list.into() }
    }

    pub fn when_blank(key: impl Into<String>, inner: Check) -> Self {
        Check::WhenBlank {
            key: key.into(),
            inner: Box::new(inner),
        }
    }

    pub fn when_not_blank(key: impl Into<String>, inner: Check) -> Self {
        Check::WhenNotBlank {
            key: key.into(),
            inner: Box::new(inner),
        }
    }

    pub fn when_us(key: impl Into<String>, inner: Check) -> Self {
        Check::WhenUs {
            key: key.into(),
            inner: Box::new(inner),
        }
    }

    pub fn when_positive(key: impl Into<String>, inner: Check) -> Self {
        Check::WhenPositive {
            key: key.into(),
            inner: Box::new(inner),
        }
    }

    /// Evaluate this check against a field value.
    pub fn evaluate(&self, value: &Value, record: &Record, ctx: &ValidationContext) -> bool {
        match self {
            Check::NotBlank => !value.is_blank(),
            Check::PositiveNumber => value.as_number().is_some_and(|n| n > 0.0),
            Check::AtLeast50K => value.as_number().is_some_and(|n| n >= 50_000.0),
            Check::ValidDate => parse_date(value).is_some(),
            Check::ValidSubrecipient => ctx
                .subrecipients
                .contains_key(value.display().trim()),
            Check::InReportingPeriod => {
                parse_date(value).is_some_and(|date| ctx.reporting_period.contains(date))
            }
            Check::InPeriodOfPerformance => parse_date(value)
                .is_some_and(|date| ctx.reporting_period.contains_performance(date)),
            Check::Equal { other } => {
                (value.loose_number() - record.value(other).loose_number()).abs() < 0.01
            }
            Check::Sum { columns } => {
                let sum: f64 = columns
                    .iter()
                    .filter(|column| !column.trim().is_empty())
                    .map(|column| record.value(column).loose_number())
                    .sum();
                cents(sum) == cents(value.loose_number())
            }
            Check::CumulativeEqual { field, filter } => {
                let prior: f64 = ctx
                    .period_summaries
                    .iter()
                    .filter(|summary| filter.matches(summary))
                    .map(|summary| summary.current_amount(field))
                    .sum();
                let total = prior + record.value(field).loose_number();
                cents(total) == cents(value.loose_number())
            }
            Check::MatchesFilePart { part } => {
                let expected = ctx.file_parts.get(part).map_or("", String::as_str);
                let actual = value.display();
                strip_leading_zeros(actual.trim()) == strip_leading_zeros(expected.trim())
            }
            Check::LessOrEqual { other } => {
                compare_numeric(value, record.value(other), |lhs, rhs| lhs <= rhs)
            }
            Check::GreaterOrEqual { other } => {
                compare_numeric(value, record.value(other), |lhs, rhs| lhs >= rhs)
            }
            Check::DropdownIncludes { list } => dropdown_includes(ctx, list, value),
            Check::WhenBlank { key, inner } => {
                if record.value(key).is_blank() {
                    inner.evaluate(value, record, ctx)
                } else {
                    true
                }
            }
            Check::WhenNotBlank { key, inner } => {
                if record.value(key).is_blank() {
                    true
                } else {
                    inner.evaluate(value, record, ctx)
                }
            }
            Check::WhenUs { key, inner } => {
                if is_united_states(record.value(key)) {
                    inner.evaluate(value, record, ctx)
                } else {
                    true
                }
            }
            Check::WhenPositive { key, inner } => {
                if record.value(key).loose_number() > 0.0 {
                    inner.evaluate(value, record, ctx)
                } else {
                    true
                }
            }
        }
    }
}

fn strip_leading_zeros(text: &str) -> &str {
    text.trim_start_matches('0')
}

/// Both sides must be numeric for the comparison to apply; anything else
/// fails the check rather than erroring.
fn compare_numeric(value: &Value, other: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), other.as_number()) {
        (Some(lhs), Some(rhs)) => cmp(lhs, rhs),
        _ => false,
    }
}

fn is_united_states(value: &Value) -> bool {
    let country = value.display().trim().to_lowercase();
    country == "usa" || country == "united states"
}

fn dropdown_includes(ctx: &ValidationContext, list: &str, value: &Value) -> bool {
    let Some(registry) = &ctx.dropdowns else {
        tracing::warn!(list = %list, "dropdown registry not initialized; failing closed");
        return false;
    };
    match registry.list(list) {
        Some(members) => members.contains(&value.display().trim().to_lowercase()),
        None => {
            tracing::warn!(list = %list, "unknown dropdown list; failing closed");
            false
        }
    }
}
