use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunErrorKind {
    Dataset,
    InvalidArgs,
    ProviderRateLimit,
    ProviderTimeout,
    ProviderServer,
    Network,
    JudgeUnavailable,
    Other,
}

impl RunErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunErrorKind::Dataset => "dataset",
            RunErrorKind::InvalidArgs => "invalid_args",
            RunErrorKind::ProviderRateLimit => "provider_rate_limit",
            RunErrorKind::ProviderTimeout => "provider_timeout",
            RunErrorKind::ProviderServer => "provider_server",
            RunErrorKind::Network => "network",
            RunErrorKind::JudgeUnavailable => "judge_unavailable",
            RunErrorKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub provider: Option<String>,
    pub detail: Option<String>,
    /// True when kind was inferred from free-form message parsing.
    pub legacy_classified: bool,
}

impl RunError {
    pub fn new(kind: RunErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            provider: None,
            detail: None,
            legacy_classified: false,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn dataset(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(RunErrorKind::Dataset, format!("dataset error: {detail}")).with_detail(detail)
    }

    pub fn invalid_args(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(RunErrorKind::InvalidArgs, detail.clone()).with_detail(detail)
    }

    pub fn provider_rate_limit(
        status: u16,
        provider: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        let detail = detail.into();
        let mut err = Self::new(RunErrorKind::ProviderRateLimit, detail.clone())
            .with_status(status)
            .with_detail(detail);
        if let Some(provider) = provider {
            err = err.with_provider(provider);
        }
        err
    }

    pub fn provider_timeout(provider: Option<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let mut err = Self::new(RunErrorKind::ProviderTimeout, detail.clone()).with_detail(detail);
        if let Some(provider) = provider {
            err = err.with_provider(provider);
        }
        err
    }

    pub fn provider_server(
        status: Option<u16>,
        provider: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        let detail = detail.into();
        let mut err = Self::new(RunErrorKind::ProviderServer, detail.clone()).with_detail(detail);
        if let Some(status) = status {
            err = err.with_status(status);
        }
        if let Some(provider) = provider {
            err = err.with_provider(provider);
        }
        err
    }

    pub fn network(provider: Option<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let mut err = Self::new(RunErrorKind::Network, detail.clone()).with_detail(detail);
        if let Some(provider) = provider {
            err = err.with_provider(provider);
        }
        err
    }

    pub fn judge_unavailable(provider: Option<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let mut err =
            Self::new(RunErrorKind::JudgeUnavailable, detail.clone()).with_detail(detail);
        if let Some(provider) = provider {
            err = err.with_provider(provider);
        }
        err
    }

    pub fn other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(RunErrorKind::Other, detail.clone()).with_detail(detail)
    }

    /// Best-effort classification of a free-form error message.
    pub fn classify_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let msg = message.to_lowercase();

        let kind = if msg.contains("dataset") || msg.contains("gpqa") {
            RunErrorKind::Dataset
        } else if msg.contains("invalid argument")
            || msg.contains("invalid args")
            || msg.contains("cannot use --")
        {
            RunErrorKind::InvalidArgs
        } else if msg.contains("rate limit") || msg.contains("429") {
            RunErrorKind::ProviderRateLimit
        } else if msg.contains("timeout") || msg.contains("deadline has elapsed") {
            RunErrorKind::ProviderTimeout
        } else if msg.contains("500")
            || msg.contains("502")
            || msg.contains("503")
            || msg.contains("504")
            || msg.contains("provider error")
        {
            RunErrorKind::ProviderServer
        } else if msg.contains("network") || msg.contains("connection") || msg.contains("dns") {
            RunErrorKind::Network
        } else if msg.contains("judge unavailable")
            || msg.contains("judge error")
            || msg.contains("judge failed")
        {
            RunErrorKind::JudgeUnavailable
        } else {
            RunErrorKind::Other
        };

        let mut run_error = Self::new(kind, message);
        run_error.legacy_classified = true;
        run_error
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(typed) = err.downcast_ref::<RunError>() {
            return typed.clone();
        }
        Self::classify_message(err.to_string())
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RunError {}

/// Loader-level failures for the dataset module.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to fetch GPQA rows (status {status}): {body}")]
    Fetch { status: u16, body: String },
    #[error("GPQA dataset is gated; set HF_TOKEN or pass --dataset-file")]
    Gated,
    #[error("failed to read dataset file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset record: {0}")]
    Parse(String),
    #[error("dataset is empty")]
    Empty,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::{RunError, RunErrorKind};

    #[test]
    fn classify_message_maps_infra_errors() {
        assert_eq!(
            RunError::classify_message("provider returned 429").kind,
            RunErrorKind::ProviderRateLimit
        );
        assert_eq!(
            RunError::classify_message("request timeout while calling provider").kind,
            RunErrorKind::ProviderTimeout
        );
        assert_eq!(
            RunError::classify_message("provider error: 503").kind,
            RunErrorKind::ProviderServer
        );
        assert_eq!(
            RunError::classify_message("network dns resolution failed").kind,
            RunErrorKind::Network
        );
    }

    #[test]
    fn classify_message_maps_dataset_errors() {
        assert_eq!(
            RunError::classify_message("dataset error: GPQA rows fetch failed").kind,
            RunErrorKind::Dataset
        );
    }

    #[test]
    fn typed_constructors_capture_stable_fields() {
        let provider = RunError::provider_server(
            Some(503),
            Some("openai".to_string()),
            "provider unavailable",
        );
        assert_eq!(provider.kind, RunErrorKind::ProviderServer);
        assert_eq!(provider.status, Some(503));
        assert_eq!(provider.provider.as_deref(), Some("openai"));
        assert!(!provider.legacy_classified);
    }

    #[test]
    fn legacy_classification_is_explicitly_marked() {
        let legacy = RunError::classify_message("provider returned 429");
        assert!(legacy.legacy_classified);
    }

    #[test]
    fn from_anyhow_preserves_typed_errors() {
        let err = anyhow::Error::new(RunError::judge_unavailable(
            Some("openai".into()),
            "judge model call failed",
        ));
        let recovered = RunError::from_anyhow(&err);
        assert_eq!(recovered.kind, RunErrorKind::JudgeUnavailable);
        assert!(!recovered.legacy_classified);
    }
}
