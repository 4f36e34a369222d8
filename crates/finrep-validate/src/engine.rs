//! Orchestrates a full validation run across all configured tabs.

use std::collections::BTreeSet;

use finrep_model::{Finding, FinrepError, Record, Result, ValidationContext, group_by_tab};

use crate::catalog::TabCatalog;

/// Cap on findings reported per tab. Earlier findings win; truncation
/// happens before flattening across tabs.
pub const MAX_FINDINGS_PER_TAB: usize = 100;

/// Validate a report: group records by tab, run each catalog in catalog
/// order, cap each tab's findings, and flatten. Records whose tab has no
/// catalog are ignored. Pure and idempotent: identical inputs produce an
/// identical finding sequence.
pub fn validate_report(
    catalogs: &[TabCatalog],
    records: Vec<Record>,
    ctx: &ValidationContext,
) -> Vec<Finding> {
    let grouped = group_by_tab(records);
    let mut findings = Vec::new();
    for catalog in catalogs {
        let mut tab_findings = catalog.run(&grouped, ctx);
        tab_findings.truncate(MAX_FINDINGS_PER_TAB);
        findings.extend(tab_findings);
    }
    findings
}

/// Like [`validate_report`], but rejects records whose tab has no
/// configured catalog instead of silently ignoring them.
pub fn validate_report_strict(
    catalogs: &[TabCatalog],
    records: Vec<Record>,
    ctx: &ValidationContext,
) -> Result<Vec<Finding>> {
    let covered: BTreeSet<&str> = catalogs.iter().map(|catalog| catalog.tab.as_str()).collect();
    if let Some(stray) = records
        .iter()
        .find(|record| !covered.contains(record.tab.as_str()))
    {
        return Err(FinrepError::UnknownTab(stray.tab.clone()));
    }
    Ok(validate_report(catalogs, records, ctx))
}
