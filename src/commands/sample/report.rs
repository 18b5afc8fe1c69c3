use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::plan::{GroupSummary, Rule, SamplePlan};

/// Label used for the single row of an ungrouped plan
const ALL_ITEMS: &str = "*";

#[derive(Serialize)]
struct ReportRow {
    combination: String,
    items: usize,
    kept: usize,
    rule: Rule,
}
impl From<&GroupSummary> for ReportRow {
    fn from(group: &GroupSummary) -> Self {
        Self {
            combination: group
                .combination
                .as_ref()
                .map_or_else(|| ALL_ITEMS.to_string(), ToString::to_string),
            items: group.items,
            kept: group.kept,
            rule: group.rule,
        }
    }
}

pub fn write_report_to<W: Write>(handle: W, plan: &SamplePlan) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(handle);
    for group in &plan.groups {
        writer.serialize(ReportRow::from(group))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report(path: &Path, plan: &SamplePlan) -> Result<()> {
    let handle = std::fs::File::create(path)
        .with_context(|| format!("Unable to create report: {}", path.display()))?;
    write_report_to(handle, plan)
}
