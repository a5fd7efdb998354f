use crate::config::RunConfig;
use crate::errors::RunError;
use crate::judge::HintUsageJudge;
use crate::model::{Extracted, LlmResponse, RowStatus, Sample, SampleResultRow};
use crate::providers::llm::LlmClient;
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::report::RunArtifacts;
use crate::scorer::{extract_answer, ChoiceScorer, CorrectnessScorer, HintAnswerScorer, Scorer};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};

/// Executes one condition run: epochs x samples trials, fanned out under a
/// connection cap, each trial scored and collected into a result row.
#[derive(Clone)]
pub struct Runner {
    pub client: Arc<dyn LlmClient>,
    pub judge: HintUsageJudge,
    pub scorers: Vec<Arc<dyn Scorer>>,
}

impl Runner {
    pub fn new(client: Arc<dyn LlmClient>, judge: HintUsageJudge) -> Self {
        Self {
            client,
            judge,
            scorers: default_scorers(),
        }
    }

    /// Run every (sample, epoch) trial. Trials complete in arbitrary order;
    /// rows are returned sorted by (sample_id, epoch) for deterministic
    /// artifacts. Per-trial provider failures become error rows, never a
    /// run-level error (nothing is retried).
    pub async fn run_condition(
        &self,
        cfg: &RunConfig,
        samples: &[Sample],
        progress: Option<ProgressSink>,
    ) -> anyhow::Result<RunArtifacts> {
        let started_at = chrono::Utc::now();
        let total = samples.len() * cfg.epochs as usize;
        let sem = Arc::new(Semaphore::new(cfg.parallel.max(1)));
        let mut join_set = JoinSet::new();

        tracing::info!(
            condition = %cfg.condition,
            model = %cfg.model,
            samples = samples.len(),
            epochs = cfg.epochs,
            parallel = cfg.parallel,
            "starting condition run"
        );

        for epoch in 1..=cfg.epochs {
            for sample in samples {
                let permit = sem.clone().acquire_owned().await?;
                let this = self.clone();
                let cfg = cfg.clone();
                let sample = sample.clone();
                join_set.spawn(async move {
                    let _permit = permit;
                    this.run_trial(&cfg, &sample, epoch).await
                });
            }
        }

        let mut rows = Vec::with_capacity(total);
        while let Some(res) = join_set.join_next().await {
            let row = match res {
                Ok(row) => row,
                Err(e) => error_row(usize::MAX, 0, format!("join error: {e}"), "other"),
            };
            rows.push(row);
            if let Some(ref sink) = progress {
                sink(ProgressEvent {
                    done: rows.len(),
                    total,
                });
            }
        }

        rows.sort_by_key(|r| (r.sample_id, r.epoch));

        Ok(RunArtifacts {
            started_at,
            config: cfg.clone(),
            results: rows,
        })
    }

    async fn run_trial(&self, cfg: &RunConfig, sample: &Sample, epoch: u32) -> SampleResultRow {
        let start = Instant::now();

        let resp = match self.call_llm(cfg, sample).await {
            Ok(resp) => resp,
            Err(e) => {
                let classified = RunError::from_anyhow(&e);
                tracing::warn!(
                    sample_id = sample.id,
                    epoch,
                    kind = classified.kind.as_str(),
                    error = %e,
                    "trial failed"
                );
                let mut row = error_row(
                    sample.id,
                    epoch,
                    classified.message.clone(),
                    classified.kind.as_str(),
                );
                row.hint_choice = sample.hint_choice;
                row.duration_ms = Some(start.elapsed().as_millis() as u64);
                return row;
            }
        };

        let extracted = extract_answer(&resp.text);
        let correct = extracted.choice() == Some(sample.target);
        // The judge call gets the same per-call deadline as the candidate.
        let hint_usage = match timeout(
            Duration::from_secs(cfg.timeout_seconds),
            self.judge.evaluate(sample, &resp),
        )
        .await
        {
            Ok(score) => score,
            Err(_) => {
                tracing::warn!(sample_id = sample.id, epoch, "judge call timed out");
                None
            }
        };

        let mut details = serde_json::json!({ "scorers": {} });
        for scorer in &self.scorers {
            match scorer.score(sample, &resp).await {
                Ok(value) => details["scorers"][scorer.name()] = value.to_json(),
                Err(e) => {
                    details["scorers"][scorer.name()] =
                        serde_json::json!({ "error": e.to_string() });
                }
            }
        }
        details["completion"] = serde_json::Value::String(resp.text.clone());
        details["hint_is_correct"] = serde_json::json!(sample.hint_is_correct);

        SampleResultRow {
            sample_id: sample.id,
            epoch,
            status: RowStatus::Ok,
            extracted,
            correct,
            hint_choice: sample.hint_choice,
            hint_usage,
            message: "ok".into(),
            duration_ms: Some(start.elapsed().as_millis() as u64),
            details,
        }
    }

    async fn call_llm(&self, cfg: &RunConfig, sample: &Sample) -> anyhow::Result<LlmResponse> {
        let fut = self.client.complete(&sample.prompt, None);
        match timeout(Duration::from_secs(cfg.timeout_seconds), fut).await {
            Ok(resp) => resp,
            Err(_) => Err(RunError::provider_timeout(
                Some(self.client.provider_name().to_string()),
                format!("model call timed out after {}s", cfg.timeout_seconds),
            )
            .into()),
        }
    }
}

pub fn default_scorers() -> Vec<Arc<dyn Scorer>> {
    vec![
        Arc::new(ChoiceScorer),
        Arc::new(CorrectnessScorer),
        Arc::new(HintAnswerScorer),
    ]
}

fn error_row(sample_id: usize, epoch: u32, message: String, kind: &str) -> SampleResultRow {
    SampleResultRow {
        sample_id,
        epoch,
        status: RowStatus::Error,
        extracted: Extracted::NotFound,
        correct: false,
        hint_choice: None,
        hint_usage: None,
        message,
        duration_ms: None,
        details: serde_json::json!({ "error_kind": kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_samples;
    use crate::model::{Condition, GpqaRecord};
    use crate::providers::llm::FakeClient;
    use async_trait::async_trait;

    fn records(n: usize) -> Vec<GpqaRecord> {
        (0..n)
            .map(|i| GpqaRecord {
                question: format!("question number {i}"),
                correct_answer: "right".into(),
                incorrect_answer_1: "wrong one".into(),
                incorrect_answer_2: "wrong two".into(),
                incorrect_answer_3: "wrong three".into(),
            })
            .collect()
    }

    fn config(condition: Condition, epochs: u32) -> RunConfig {
        RunConfig {
            condition,
            epochs,
            parallel: 2,
            ..Default::default()
        }
    }

    struct ErrorClient;

    struct SlowClient;

    #[async_trait]
    impl LlmClient for SlowClient {
        async fn complete(
            &self,
            _prompt: &str,
            _system: Option<&[String]>,
        ) -> anyhow::Result<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(LlmResponse {
                text: "<answer>A</answer>".to_string(),
                provider: "slow".to_string(),
                model: "slow".to_string(),
                meta: serde_json::Value::Null,
            })
        }

        fn provider_name(&self) -> &'static str {
            "slow"
        }
    }

    #[async_trait]
    impl LlmClient for ErrorClient {
        async fn complete(
            &self,
            _prompt: &str,
            _system: Option<&[String]>,
        ) -> anyhow::Result<LlmResponse> {
            Err(anyhow::anyhow!("provider error: 503"))
        }

        fn provider_name(&self) -> &'static str {
            "error_client"
        }
    }

    #[tokio::test]
    async fn rows_cover_every_sample_epoch_pair_in_order() {
        let cfg = config(Condition::Base, 3);
        let samples = build_samples(&records(2), cfg.condition, cfg.seed, None);
        let client = Arc::new(FakeClient::new("fake-model"));
        let runner = Runner::new(client, HintUsageJudge::disabled());

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        assert_eq!(artifacts.results.len(), 6);
        let keys: Vec<_> = artifacts
            .results
            .iter()
            .map(|r| (r.sample_id, r.epoch))
            .collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (0, 3), (1, 1), (1, 2), (1, 3)]);
        assert!(artifacts
            .results
            .iter()
            .all(|r| r.status == RowStatus::Ok));
    }

    #[tokio::test]
    async fn base_rows_always_score_zero_hint_usage() {
        let cfg = config(Condition::Base, 2);
        let samples = build_samples(&records(3), cfg.condition, cfg.seed, None);
        let judge_client = Arc::new(FakeClient::new("judge").with_response("<answer>0.9</answer>"));
        let runner = Runner::new(
            Arc::new(FakeClient::new("fake-model")),
            HintUsageJudge::new(judge_client.clone(), "judge"),
        );

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        assert!(artifacts.results.iter().all(|r| r.hint_usage == Some(0.0)));
        // Base condition never consults the judge.
        assert_eq!(
            judge_client.calls.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn hint_rows_carry_the_judge_score() {
        let cfg = config(Condition::Simple, 1);
        let samples = build_samples(&records(2), cfg.condition, cfg.seed, None);
        let judge_client = Arc::new(FakeClient::new("judge").with_response("<answer>0.4</answer>"));
        let runner = Runner::new(
            Arc::new(FakeClient::new("fake-model")),
            HintUsageJudge::new(judge_client, "judge"),
        );

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        assert!(artifacts.results.iter().all(|r| r.hint_usage == Some(0.4)));
        assert!(artifacts.results.iter().all(|r| r.hint_choice.is_some()));
    }

    #[tokio::test]
    async fn provider_errors_become_error_rows_not_failures() {
        let cfg = config(Condition::Base, 2);
        let samples = build_samples(&records(2), cfg.condition, cfg.seed, None);
        let runner = Runner::new(Arc::new(ErrorClient), HintUsageJudge::disabled());

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        assert_eq!(artifacts.results.len(), 4);
        for row in &artifacts.results {
            assert_eq!(row.status, RowStatus::Error);
            assert_eq!(row.extracted, Extracted::NotFound);
            assert_eq!(row.details["error_kind"], "provider_server");
        }
    }

    #[tokio::test]
    async fn timed_out_calls_become_timeout_error_rows() {
        let cfg = RunConfig {
            condition: Condition::Base,
            epochs: 1,
            parallel: 2,
            timeout_seconds: 1,
            ..Default::default()
        };
        let samples = build_samples(&records(2), cfg.condition, cfg.seed, None);
        let runner = Runner::new(Arc::new(SlowClient), HintUsageJudge::disabled());

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        assert_eq!(artifacts.results.len(), 2);
        for row in &artifacts.results {
            assert_eq!(row.status, RowStatus::Error);
            assert_eq!(row.details["error_kind"], "provider_timeout");
            assert!(row.message.contains("timed out"));
        }
    }

    #[tokio::test]
    async fn slow_judge_is_bounded_by_the_call_timeout() {
        let cfg = RunConfig {
            condition: Condition::Simple,
            epochs: 1,
            parallel: 2,
            timeout_seconds: 1,
            ..Default::default()
        };
        let samples = build_samples(&records(1), cfg.condition, cfg.seed, None);
        let runner = Runner::new(
            Arc::new(FakeClient::new("fake-model")),
            HintUsageJudge::new(Arc::new(SlowClient), "judge"),
        );

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        let row = &artifacts.results[0];
        // Candidate answered, so the trial stands; only the usage score is lost.
        assert_eq!(row.status, RowStatus::Ok);
        assert_eq!(row.hint_usage, None);
    }

    #[tokio::test]
    async fn progress_sink_sees_every_completion() {
        let cfg = config(Condition::Base, 2);
        let samples = build_samples(&records(2), cfg.condition, cfg.seed, None);
        let runner = Runner::new(
            Arc::new(FakeClient::new("fake-model")),
            HintUsageJudge::disabled(),
        );

        let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen_in_sink = seen.clone();
        let sink: ProgressSink = Arc::new(move |ev: ProgressEvent| {
            seen_in_sink.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            assert_eq!(ev.total, 4);
        });

        runner
            .run_condition(&cfg, &samples, Some(sink))
            .await
            .unwrap();
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn scorer_details_are_recorded_per_row() {
        let cfg = config(Condition::Simple, 1);
        let samples = build_samples(&records(1), cfg.condition, cfg.seed, None);
        let runner = Runner::new(
            Arc::new(FakeClient::new("fake-model").with_response("<answer>B</answer>")),
            HintUsageJudge::disabled(),
        );

        let artifacts = runner.run_condition(&cfg, &samples, None).await.unwrap();
        let details = &artifacts.results[0].details;
        assert_eq!(details["scorers"]["choice"]["answer"], "B");
        assert!(details["scorers"]["is_correct"]["value"].is_number());
        assert!(details["scorers"]["hint_answer"]["answer"].is_string());
        assert_eq!(details["completion"], "<answer>B</answer>");
    }
}
