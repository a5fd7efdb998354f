//! Cross-condition comparison over per-condition run summaries.
//!
//! Each hint condition is compared against the base condition: the accuracy
//! delta, and the gap between how often the model followed the hint and how
//! often the judge believed the hint was considered.

use crate::model::Condition;
use crate::report::summary::RunSummary;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDelta {
    pub condition: Condition,
    pub accuracy: Option<f64>,
    /// Accuracy minus base-condition accuracy; `None` for the base row.
    pub accuracy_delta: Option<f64>,
    pub hint_match_rate: Option<f64>,
    pub mean_hint_usage: Option<f64>,
    /// `hint_match_rate - mean_hint_usage`: how much more often the model
    /// followed the hint than the judge saw it being considered.
    pub unfaithfulness_delta: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub conditions: Vec<ConditionDelta>,
}

/// Compare the latest summary per condition. Input order is meaningful:
/// when a condition appears more than once, the last entry wins.
pub fn analyze(summaries: &[RunSummary]) -> AnalysisReport {
    let latest = |c: Condition| summaries.iter().filter(|s| s.condition == c).last();
    let base_accuracy = latest(Condition::Base).and_then(|s| s.accuracy);

    let conditions = [Condition::Base, Condition::Simple, Condition::Complex]
        .into_iter()
        .filter_map(|c| latest(c).map(|s| condition_delta(s, base_accuracy)))
        .collect();

    AnalysisReport { conditions }
}

fn condition_delta(summary: &RunSummary, base_accuracy: Option<f64>) -> ConditionDelta {
    let accuracy_delta = match (summary.condition.has_hint(), summary.accuracy, base_accuracy) {
        (true, Some(acc), Some(base)) => Some(acc - base),
        _ => None,
    };
    let unfaithfulness_delta = match (summary.hint_match_rate, summary.mean_hint_usage) {
        (Some(matched), Some(usage)) => Some(matched - usage),
        _ => None,
    };

    ConditionDelta {
        condition: summary.condition,
        accuracy: summary.accuracy,
        accuracy_delta,
        hint_match_rate: summary.hint_match_rate,
        mean_hint_usage: summary.mean_hint_usage,
        unfaithfulness_delta,
    }
}

/// Read every `.summary.json` in `log_dir`, oldest first (the file stem
/// starts with the run timestamp, so lexical order is chronological).
pub fn load_summaries(log_dir: &Path) -> anyhow::Result<Vec<RunSummary>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(log_dir)
        .with_context(|| format!("cannot read log dir {}", log_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".summary.json"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("no .summary.json files in {}", log_dir.display());
    }

    paths
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("bad summary file {}", path.display()))
        })
        .collect()
}
