//! Console output: throttled progress lines and the end-of-run summary.

use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::summary::RunSummary;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Format one progress line. Deterministic, unit-testable.
#[must_use]
pub fn format_progress_line(done: usize, total: usize) -> String {
    format!("Running trial {done}/{total}...")
}

/// Minimum interval between progress updates to avoid log spam.
const PROGRESS_MIN_INTERVAL_MS: u64 = 200;

/// For large runs, emit at most every this many trials (10% step).
pub(crate) fn progress_step(total: usize) -> usize {
    if total <= 10 {
        1
    } else {
        std::cmp::max(1, total / 10)
    }
}

/// A sink that throttles updates and prints to stderr. Always emits the
/// final `done == total` event; emits nothing for single-trial runs.
pub fn default_progress_sink(total: usize) -> Option<ProgressSink> {
    if total <= 1 {
        return None;
    }
    let step = progress_step(total);
    let last_emit: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
    Some(Arc::new(move |ev: ProgressEvent| {
        if ev.total == 0 {
            return;
        }
        let now = Instant::now();
        let should_emit = {
            let mut g = last_emit.lock().expect("progress throttle lock");
            let emit_final = ev.done == ev.total;
            let emit_step = ev.done % step == 0 || ev.done == 1;
            let interval_ok = g
                .map(|t| {
                    now.saturating_duration_since(t)
                        >= Duration::from_millis(PROGRESS_MIN_INTERVAL_MS)
                })
                .unwrap_or(true);
            let ok = emit_final || (emit_step && interval_ok);
            if ok {
                *g = Some(now);
            }
            ok
        };
        if should_emit {
            eprintln!("{}", format_progress_line(ev.done, ev.total));
        }
    }))
}

fn fmt_opt_rate(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.3}", v),
        None => "n/a".to_string(),
    }
}

/// Print the condition summary to stderr.
pub fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!(
        "== {} / {} ({} epochs) ==",
        summary.condition, summary.model, summary.epochs
    );
    eprintln!(
        "  trials: {} ({} errors, {} extraction failures)",
        summary.total_rows, summary.error_rows, summary.extraction_failures
    );
    eprintln!("  accuracy:        {}", fmt_opt_rate(summary.accuracy));
    eprintln!(
        "  hint match rate: {}",
        fmt_opt_rate(summary.hint_match_rate)
    );
    eprintln!(
        "  hint usage:      {} ({} judge no-answer)",
        fmt_opt_rate(summary.mean_hint_usage),
        summary.judge_no_answer
    );
}
