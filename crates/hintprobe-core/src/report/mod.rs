pub mod analyze;
pub mod console;
pub mod json;
pub mod progress;
pub mod summary;

use crate::config::RunConfig;
use crate::model::SampleResultRow;
use serde::{Deserialize, Serialize};

/// Everything a finished condition run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunArtifacts {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub config: RunConfig,
    pub results: Vec<SampleResultRow>,
}
