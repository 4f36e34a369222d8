//! Validation findings reported back to the uploader.

use serde::{Deserialize, Serialize};

/// One reported validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    /// Tab the failing record came from.
    pub tab: String,
    /// Source row, when the finding is attributable to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
}

impl Finding {
    pub fn new(message: impl Into<String>, tab: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tab: tab.into(),
            row: None,
        }
    }

    pub fn with_row(mut self, row: u32) -> Self {
        self.row = Some(row);
        self
    }
}
