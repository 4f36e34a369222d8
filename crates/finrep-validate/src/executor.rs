//! Per-record rule execution.

use finrep_model::{Finding, Record, ValidationContext, Value};

use crate::dates::{format_mmddyyyy, parse_date};
use crate::rule::Rule;

/// Evaluate an ordered rule list against one record, reporting failures
/// under the given row number. Findings come out in rule-list order.
pub fn validate_fields(
    rules: &[Rule],
    record: &Record,
    row: u32,
    ctx: &ValidationContext,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in rules {
        if !rule.applies_to(&ctx.tags) {
            continue;
        }
        let value = record.value(&rule.field);
        if rule.check.evaluate(value, record, ctx) {
            continue;
        }
        let display = display_value(value, rule.is_date_value);
        let template = rule
            .message
            .clone()
            .unwrap_or_else(|| default_message(&rule.field));
        let message = template.replacen("{}", &display, 1);
        findings.push(Finding::new(message, record.tab.as_str()).with_row(row));
    }
    findings
}

fn default_message(field: &str) -> String {
    format!("Empty or invalid entry for {field}: \"{{}}\"")
}

/// Date-valued fields render as MM/DD/YYYY when the raw value parses;
/// everything else passes through unchanged.
fn display_value(value: &Value, is_date_value: bool) -> String {
    if is_date_value {
        if let Some(date) = parse_date(value) {
            return format_mmddyyyy(date);
        }
    }
    value.display()
}
