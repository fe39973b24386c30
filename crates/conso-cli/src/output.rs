//! Output formatting for validation reports

use conso_core::{Finding, Outcome, Status};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Machine-readable report: the overall status next to everything found
#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    status: Status,
    warnings: usize,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

pub fn render_outcome(outcome: &Outcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                status: outcome.status(),
                warnings: outcome.warning_count(),
                outcome,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Table => Ok(render_table(outcome)),
    }
}

fn render_table(outcome: &Outcome) -> String {
    let mut out = String::new();
    for diagnostic in &outcome.diagnostics {
        out.push_str(&format!(
            "{}[{}] {}\n",
            diagnostic.severity,
            diagnostic.category,
            diagnostic
        ));
    }

    for finding in &outcome.findings {
        out.push('\n');
        render_finding(&mut out, finding);
    }

    if let Some(stage) = outcome.halted_at {
        out.push_str(&format!(
            "\nStopped during the {} stage; later tables were not checked\n",
            stage
        ));
    }

    if !out.is_empty() {
        out.push('\n');
    }
    let counts = &outcome.counts;
    out.push_str(&format!(
        "Checked {} classes, {} terms ({} withdrawn), {} synonyms, {} xrefs, {} relations\n",
        counts.classes,
        counts.terms,
        counts.withdrawn,
        counts.synonyms,
        counts.xrefs,
        counts.relations
    ));
    match outcome.status() {
        Status::Success if outcome.warning_count() == 0 => out.push_str("All checks passed\n"),
        Status::Success => out.push_str(&format!(
            "All checks passed with {} warning(s)\n",
            outcome.warning_count()
        )),
        Status::Failure { errors } => out.push_str(&format!(
            "Found {} error(s) and {} warning(s)\n",
            errors,
            outcome.warning_count()
        )),
    }
    out
}

fn render_finding(out: &mut String, finding: &Finding) {
    out.push_str(&format!(
        "{} (add rows to {}):\n",
        finding.summary(),
        finding.table
    ));
    for entry in &finding.missing {
        out.push_str(&format!("    {}\n", entry.suggestion));
    }
}
