//! Output formatting utilities.

use bpmn_eval_metrics::MetricsReport;
use bpmn_eval_xml::Verdict;

/// Prints a human-readable verdict.
pub fn print_verdict(verdict: &Verdict, show_canonical: bool) {
    println!("Valid: {}", verdict.is_valid());
    println!("Errors: {}", verdict.errors().len());
    println!("Warnings: {}", verdict.warnings().len());

    print_list("Errors", verdict.errors());
    print_list("Warnings", verdict.warnings());

    if show_canonical {
        if let Some(canonical) = verdict.canonical_xml() {
            println!("\nCanonical XML:");
            println!("{}", canonical);
        }
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

/// Prints the metrics table.
pub fn print_metrics(report: &MetricsReport) {
    println!("{}", "=".repeat(50));
    println!("EVALUATION METRICS");
    println!("{}", "=".repeat(50));
    println!("{:<26} {}", "Schema Validation Rate:", percent(report.schema_validation_rate));
    println!("{:<26} {}", "Schema Violation Rate:", percent(report.schema_violation_rate));
    println!("{:<26} {}", "Exact Match Rate:", percent(report.exact_match_rate));
    println!("{:<26} {}", "Element Precision:", percent(report.element_precision));
    println!("{:<26} {}", "Element Recall:", percent(report.element_recall));
    println!("{:<26} {}", "Element F1:", percent(report.element_f1));
    println!("{:<26} {:.4}", "Avg Tree Edit Distance:", report.avg_tree_edit_distance);
    println!("{}", "=".repeat(50));
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
