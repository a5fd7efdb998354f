//! GPQA rows from the Hugging Face datasets-server API.

use crate::errors::DatasetError;
use crate::model::GpqaRecord;
use serde::Deserialize;

pub const DATASET: &str = "Idavidrein/gpqa";
pub const DEFAULT_CONFIG: &str = "gpqa_main";
pub const SPLIT: &str = "train";

const ROWS_ENDPOINT: &str = "https://datasets-server.huggingface.co/rows";
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Value,
}

/// Fetch the full train split, paginated. The dataset is gated on the hub;
/// `hf_token` (from `HF_TOKEN`) is sent as a bearer when present.
pub async fn fetch_records(
    client: &reqwest::Client,
    config: &str,
    hf_token: Option<&str>,
) -> Result<Vec<GpqaRecord>, DatasetError> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    loop {
        let offset_s = offset.to_string();
        let length_s = PAGE_SIZE.to_string();
        let mut req = client.get(ROWS_ENDPOINT).query(&[
            ("dataset", DATASET),
            ("config", config),
            ("split", SPLIT),
            ("offset", offset_s.as_str()),
            ("length", length_s.as_str()),
        ]);
        if let Some(token) = hf_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(DatasetError::Gated);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DatasetError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        let page: RowsPage = resp.json().await?;
        let page_len = page.rows.len();
        for entry in page.rows {
            records.push(parse_row(entry.row)?);
        }

        offset += page_len;
        if page_len == 0 || offset >= page.num_rows_total {
            break;
        }
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    tracing::info!(rows = records.len(), dataset = DATASET, "loaded GPQA records");
    Ok(records)
}

pub(crate) fn parse_row(row: serde_json::Value) -> Result<GpqaRecord, DatasetError> {
    serde_json::from_value(row).map_err(|e| DatasetError::Parse(e.to_string()))
}
