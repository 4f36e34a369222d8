pub mod context;
pub mod error;
pub mod finding;
pub mod record;
pub mod value;

pub use context::{
    ContextBuilder, DropdownRegistry, PeriodSummary, ReportingPeriod, ValidationContext,
    compute_subrecipient_lookup,
};
pub use error::{FinrepError, Result};
pub use finding::Finding;
pub use record::{Record, RecordSet, group_by_tab};
pub use value::{Value, cents};
