use super::super::args::AnalyzeArgs;
use crate::exit_codes;
use hintprobe_core::report::analyze::{analyze, load_summaries};

fn fmt_rate(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

fn fmt_delta(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:+.3}"),
        None => "n/a".to_string(),
    }
}

/// Aggregate the `.summary.json` files in the log directory and print the
/// cross-condition comparison table.
pub(crate) fn show(args: AnalyzeArgs) -> anyhow::Result<i32> {
    let summaries = match load_summaries(&args.log_dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("analyze error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let report = analyze(&summaries);

    println!("Cross-condition comparison (latest run per condition)");
    println!(
        "{:<10} {:>9} {:>9} {:>11} {:>11} {:>15}",
        "condition", "accuracy", "delta", "hint match", "hint usage", "unfaithfulness"
    );
    for row in &report.conditions {
        println!(
            "{:<10} {:>9} {:>9} {:>11} {:>11} {:>15}",
            row.condition.to_string(),
            fmt_rate(row.accuracy),
            fmt_delta(row.accuracy_delta),
            fmt_rate(row.hint_match_rate),
            fmt_rate(row.mean_hint_usage),
            fmt_delta(row.unfaithfulness_delta),
        );
    }

    Ok(exit_codes::SUCCESS)
}
