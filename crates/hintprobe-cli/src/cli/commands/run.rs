use super::super::args::{JudgeKind, ProviderKind, RunArgs};
use crate::exit_codes;
use hintprobe_core::config::{RunConfig, DEFAULT_SEED};
use hintprobe_core::dataset;
use hintprobe_core::engine::Runner;
use hintprobe_core::errors::DatasetError;
use hintprobe_core::judge::HintUsageJudge;
use hintprobe_core::model::GpqaRecord;
use hintprobe_core::providers::llm::{FakeClient, LlmClient, OpenAIClient};
use hintprobe_core::report::console::{default_progress_sink, print_summary};
use hintprobe_core::report::json::write_run_log;
use hintprobe_core::report::summary::{write_summary, RunSummary};
use std::sync::Arc;

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let cfg = RunConfig {
        condition: args.condition,
        model: args.model.clone(),
        judge_model: args.judge_model.clone(),
        limit: Some(args.samples),
        epochs: args.epochs,
        parallel: args.max_connections,
        timeout_seconds: args.timeout_seconds,
        seed: args.seed.unwrap_or(DEFAULT_SEED),
        log_dir: args.log_dir.clone(),
    };

    if let Err(e) = cfg.validate() {
        eprintln!("config error: {e}");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let records = match load_records(&args).await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("dataset error: {e}");
            let code = match e {
                DatasetError::Fetch { .. } | DatasetError::Http(_) => exit_codes::INFRA_ERROR,
                _ => exit_codes::CONFIG_ERROR,
            };
            return Ok(code);
        }
    };

    if args.samples > records.len() {
        eprintln!(
            "config error: requested {} samples but the dataset has {}",
            args.samples,
            records.len()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let samples = dataset::build_samples(&records, cfg.condition, cfg.seed, cfg.limit);
    tracing::info!(
        condition = %cfg.condition,
        samples = samples.len(),
        epochs = cfg.epochs,
        model = %cfg.model,
        "starting run"
    );

    let client = match candidate_client(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let judge = match judge_service(&args) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let runner = Runner::new(client, judge);
    let total = samples.len() * cfg.epochs as usize;
    let artifacts = runner
        .run_condition(&cfg, &samples, default_progress_sink(total))
        .await?;

    let log_path = write_run_log(&artifacts, &cfg.log_dir)?;
    let summary = RunSummary::from_artifacts(&artifacts);
    let summary_path = log_path.with_extension("summary.json");
    write_summary(&summary, &summary_path)?;

    print_summary(&summary);
    eprintln!();
    eprintln!("run log: {}", log_path.display());
    eprintln!("summary: {}", summary_path.display());

    if summary.error_rows > 0 {
        Ok(exit_codes::EVAL_ERRORS)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

async fn load_records(args: &RunArgs) -> Result<Vec<GpqaRecord>, DatasetError> {
    if let Some(path) = &args.dataset_file {
        return dataset::load_records_from_file(path);
    }
    let hf_token = std::env::var("HF_TOKEN").ok();
    dataset::load_gpqa(&args.dataset_config, hf_token.as_deref()).await
}

fn candidate_client(args: &RunArgs) -> anyhow::Result<Arc<dyn LlmClient>> {
    Ok(match args.provider {
        ProviderKind::Openai => Arc::new(OpenAIClient::from_env(
            args.model.clone(),
            args.temperature,
            args.max_tokens,
        )?),
        ProviderKind::Fake => Arc::new(FakeClient::new(args.model.clone())),
    })
}

fn judge_service(args: &RunArgs) -> anyhow::Result<HintUsageJudge> {
    Ok(match args.judge {
        JudgeKind::None => HintUsageJudge::disabled(),
        JudgeKind::Fake => HintUsageJudge::new(
            Arc::new(FakeClient::new(args.judge_model.clone()).with_response(
                "No sign the hint was considered. <answer>0</answer>",
            )),
            args.judge_model.clone(),
        ),
        // Judge runs at temperature 0 with a short completion budget.
        JudgeKind::Openai => HintUsageJudge::new(
            Arc::new(OpenAIClient::from_env(args.judge_model.clone(), 0.0, 1024)?),
            args.judge_model.clone(),
        ),
    })
}
