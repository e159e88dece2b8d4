use std::io::Write;

use serde::Serialize;
use tracing::warn;

use super::models::PackageCoverage;
use crate::error::Result;

/// Printed instead of a percentage for packages that track no statements.
pub const NO_STATEMENTS: &str = "no statements";

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub package: String,
    pub covered_statements: u64,
    pub total_statements: u64,

    /// Covered statements as a percentage, or `None` if the package has no
    /// statements.
    pub coverage: Option<f64>,
}

impl From<&PackageCoverage> for PackageSummary {
    fn from(package: &PackageCoverage) -> Self {
        let totals = package.totals();
        Self {
            package: package.package.clone(),
            covered_statements: totals.covered_statements,
            total_statements: totals.total_statements,
            coverage: totals.ratio().map(|ratio| ratio * 100.0),
        }
    }
}

/// Computes the report rows, keeping the order of `packages`.
pub fn summarize(packages: &[PackageCoverage]) -> Vec<PackageSummary> {
    packages
        .iter()
        .map(|package| {
            let summary = PackageSummary::from(package);
            if summary.coverage.is_none() {
                warn!(package = %summary.package, "package has no statements");
            }
            summary
        })
        .collect()
}

/// Renders one line per package:
///
/// ```text
/// example.com/mod     coverage (81.3)%
/// example.com/mod/sub coverage (no statements)
/// ```
///
/// Package names are padded so the `coverage` column lines up.
pub fn render_text(summaries: &[PackageSummary]) -> String {
    let width = summaries
        .iter()
        .map(|s| s.package.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for summary in summaries {
        let padding = width - summary.package.chars().count() + 1;
        out.push_str(&summary.package);
        out.extend(std::iter::repeat(' ').take(padding));
        match summary.coverage {
            Some(percentage) => out.push_str(&format!("coverage ({percentage:.1})%")),
            None => out.push_str(&format!("coverage ({NO_STATEMENTS})")),
        }
        out.push('\n');
    }
    out
}

pub fn write_text(out: &mut impl Write, summaries: &[PackageSummary]) -> Result<()> {
    out.write_all(render_text(summaries).as_bytes())?;
    Ok(())
}

/// Writes the rows as a pretty-printed JSON array.
pub fn write_json(out: &mut impl Write, summaries: &[PackageSummary]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, summaries)?;
    writeln!(out)?;
    Ok(())
}
