//! JSON reporter

use crate::models::WatchReport;
use anyhow::Result;

/// Render the full report as pretty-printed JSON
pub fn render(report: &WatchReport) -> Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}
