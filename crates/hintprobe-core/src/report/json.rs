use crate::report::RunArtifacts;
use std::path::{Path, PathBuf};

/// File stem for one run log: `{started_at}_{condition}_{model}`.
pub fn log_file_stem(artifacts: &RunArtifacts) -> String {
    let ts = artifacts.started_at.format("%Y-%m-%dT%H-%M-%S");
    let model = artifacts
        .config
        .model
        .replace(['/', ':', ' '], "-");
    format!("{ts}_{}_{model}", artifacts.config.condition)
}

/// Write the full run log (config plus every result row) into `log_dir`,
/// creating it if needed. Returns the written path.
pub fn write_run_log(artifacts: &RunArtifacts, log_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(format!("{}.json", log_file_stem(artifacts)));
    let v = serde_json::json!({
        "started_at": artifacts.started_at.to_rfc3339(),
        "config": artifacts.config,
        "results": artifacts.results,
    });
    std::fs::write(&path, serde_json::to_string_pretty(&v)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::model::Condition;

    #[test]
    fn run_log_is_written_into_the_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = RunArtifacts {
            started_at: chrono::Utc::now(),
            config: RunConfig {
                condition: Condition::Complex,
                model: "openai/gpt-4o".into(),
                ..Default::default()
            },
            results: vec![],
        };
        let path = write_run_log(&artifacts, dir.path()).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.contains("_complex_"));
        assert!(name.contains("openai-gpt-4o"));
        let body: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(body["config"]["condition"], "complex");
        assert!(body["results"].as_array().unwrap().is_empty());
    }
}
