//! Raw field values extracted from report spreadsheets.

use serde::{Deserialize, Serialize};

/// Shared stand-in for absent fields.
static BLANK: Value = Value::Text(String::new());

/// A raw cell value as extracted from an uploaded report.
///
/// Extraction yields either text or a number; absent fields never reach
/// validation code, because record lookups substitute the blank value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    /// The value an absent field reads as.
    pub fn blank() -> &'static Value {
        &BLANK
    }

    /// Blank means empty text after trimming. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(text) => text.trim().is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Strict numeric view: `None` unless the value is a number or text
    /// that parses as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            Value::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Loose coercion used by amount arithmetic: anything that does not
    /// parse counts as zero.
    pub fn loose_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Raw display form. Integral numbers print without a decimal point,
    /// matching how they appear in the source sheet.
    pub fn display(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    format!("{}", *number as i64)
                } else {
                    format!("{number}")
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(number as f64)
    }
}

/// Round an amount to cents. Sum comparisons happen on this basis, so the
/// only numeric tolerance is two-decimal rounding.
pub fn cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
