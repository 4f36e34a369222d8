//! Rule evaluation engine for financial-report validation.
//!
//! Records extracted from an uploaded report are checked against per-tab
//! rule catalogs; failures come back as an ordered, bounded list of
//! human-readable findings. Catalogs are plain data (see [`Check`] and
//! [`Rule`]), so they can be serialized, inspected, and tested in
//! isolation.

mod catalog;
mod check;
mod dates;
mod engine;
mod executor;
mod rule;

pub use catalog::{Cardinality, TabCatalog};
pub use check::{Check, SummaryFilter};
pub use dates::{format_mmddyyyy, parse_date};
pub use engine::{MAX_FINDINGS_PER_TAB, validate_report, validate_report_strict};
pub use executor::validate_fields;
pub use rule::Rule;
