//! Field rules: a check bound to a field plus reporting metadata.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::check::Check;

/// One entry of a tab's rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Field key the check reads its value from.
    pub field: String,
    pub check: Check,
    /// Message template; `{}` is replaced with the field's display value.
    /// Absent means the default "Empty or invalid entry" template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When present, the rule applies only if it shares a tag with the
    /// run's active tag set. Absent means the rule always applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    /// Render the failing value as MM/DD/YYYY when it parses as a date.
    #[serde(default)]
    pub is_date_value: bool,
}

impl Rule {
    pub fn new(field: impl Into<String>, check: Check) -> Self {
        Self {
            field: field.into(),
            check,
            message: None,
            tags: None,
            is_date_value: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_value(mut self) -> Self {
        self.is_date_value = true;
        self
    }

    /// Tag gate: untagged rules always apply; tagged rules apply only
    /// when they intersect the active set.
    pub fn applies_to(&self, active_tags: &BTreeSet<String>) -> bool {
        match &self.tags {
            None => true,
            Some(tags) => tags.iter().any(|tag| active_tags.contains(tag)),
        }
    }
}
