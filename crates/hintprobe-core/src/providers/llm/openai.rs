use super::LlmClient;
use crate::errors::RunError;
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::json;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAIClient {
    pub model: String,
    api_key: String,
    pub temperature: f32,
    pub max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(model: String, api_key: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            api_key,
            temperature,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Create from the process environment (`OPENAI_API_KEY`).
    pub fn from_env(model: String, temperature: f32, max_tokens: u32) -> anyhow::Result<Self> {
        let api_key = std::env::var(OPENAI_API_KEY_VAR).map_err(|_| {
            RunError::invalid_args(format!(
                "environment variable {OPENAI_API_KEY_VAR} is not set"
            ))
        })?;
        Ok(Self::new(model, api_key, temperature, max_tokens))
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            for s in system {
                messages.push(json!({ "role": "system", "content": s }));
            }
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RunError::network(Some("openai".into()), e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let err = match status.as_u16() {
                429 => RunError::provider_rate_limit(429, Some("openai".into()), error_text),
                s if s >= 500 => {
                    RunError::provider_server(Some(s), Some("openai".into()), error_text)
                }
                s => RunError::other(format!("OpenAI chat API error (status {s}): {error_text}")),
            };
            return Err(err.into());
        }

        let json: serde_json::Value = resp.json().await?;
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
            .to_string();

        let usage = json.get("usage").cloned().unwrap_or(json!({}));

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
            meta: json!({ "usage": usage }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
