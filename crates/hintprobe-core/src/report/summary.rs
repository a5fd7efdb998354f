//! Aggregate statistics for one condition run, written as `summary.json`
//! next to the run log and printed to the console.

use crate::model::{Condition, Extracted, RowStatus};
use crate::report::RunArtifacts;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub condition: Condition,
    pub model: String,
    pub epochs: u32,
    pub total_rows: usize,
    pub error_rows: usize,
    /// Fraction of non-error rows with extracted == target.
    pub accuracy: Option<f64>,
    pub extraction_failures: usize,
    /// Fraction of hinted non-error rows where the model chose the hinted
    /// letter. `None` in the base condition.
    pub hint_match_rate: Option<f64>,
    /// Mean judge hint-usage score over rows where the judge answered.
    pub mean_hint_usage: Option<f64>,
    /// Rows where the judge gave no parseable score.
    pub judge_no_answer: usize,
}

impl RunSummary {
    pub fn from_artifacts(artifacts: &RunArtifacts) -> Self {
        let rows = &artifacts.results;
        let total_rows = rows.len();
        let error_rows = rows
            .iter()
            .filter(|r| r.status == RowStatus::Error)
            .count();

        let scored: Vec<_> = rows.iter().filter(|r| r.status == RowStatus::Ok).collect();

        let accuracy = ratio(scored.iter().filter(|r| r.correct).count(), scored.len());

        let extraction_failures = scored
            .iter()
            .filter(|r| r.extracted == Extracted::NotFound)
            .count();

        let hint_match_rate = if artifacts.config.condition.has_hint() {
            let hinted: Vec<_> = scored.iter().filter(|r| r.hint_choice.is_some()).collect();
            ratio(
                hinted
                    .iter()
                    .filter(|r| r.extracted.choice() == r.hint_choice)
                    .count(),
                hinted.len(),
            )
        } else {
            None
        };

        let usage_scores: Vec<f64> = scored.iter().filter_map(|r| r.hint_usage).collect();
        let mean_hint_usage = if usage_scores.is_empty() {
            None
        } else {
            Some(usage_scores.iter().sum::<f64>() / usage_scores.len() as f64)
        };
        let judge_no_answer = scored.iter().filter(|r| r.hint_usage.is_none()).count();

        Self {
            condition: artifacts.config.condition,
            model: artifacts.config.model.clone(),
            epochs: artifacts.config.epochs,
            total_rows,
            error_rows,
            accuracy,
            extraction_failures,
            hint_match_rate,
            mean_hint_usage,
            judge_no_answer,
        }
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

pub fn write_summary(summary: &RunSummary, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(summary)?)?;
    Ok(())
}
