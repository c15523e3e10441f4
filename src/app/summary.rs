use crate::domain::model::{AnalysisReport, CompactEncoding};
use std::fmt::Write;

/// Console summary of a finished analysis.
pub fn render_summary(report: &AnalysisReport) -> String {
    let comparison = &report.comparison;
    let mut out = String::new();

    let _ = writeln!(out, "Dataset: {} ({})", report.source, report.encoding_name);
    let _ = writeln!(out, "JSON tokens: {}", comparison.hierarchical.token_count);

    match &comparison.compact {
        CompactEncoding::Available(compact) => {
            let _ = writeln!(out, "TOON tokens: {}", compact.token_count);
            let _ = writeln!(
                out,
                "Savings: {:.2}%",
                comparison.savings_percent.unwrap_or_default()
            );
        }
        CompactEncoding::Unavailable { reason } => {
            let _ = writeln!(out, "TOON tokens: unavailable ({})", reason);
            let _ = writeln!(out, "Savings: n/a");
        }
    }

    if report.projections.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Context usage per model:");
    for projection in &report.projections {
        let _ = write!(
            out,
            "  {:<24} window {:>9}  JSON {:>6.2}%",
            projection.model_name,
            projection.context_window_tokens,
            projection.hierarchical_usage_fraction * 100.0
        );

        match (
            projection.compact_usage_fraction,
            projection.cost_savings_per_1000_requests,
        ) {
            (Some(usage), Some(savings)) => {
                let _ = write!(
                    out,
                    "  TOON {:>6.2}%  saves ${:.4} per 1000 requests",
                    usage * 100.0,
                    savings
                );
                if let Some(multiplier) = projection.capacity_multiplier {
                    let _ = write!(out, "  ({:.2}x capacity)", multiplier);
                }
            }
            _ => {
                let _ = write!(out, "  TOON n/a");
            }
        }
        let _ = writeln!(out);
    }

    out
}
