use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Deterministic in-process client for tests and the `fake` provider flag.
/// Replies with a fixed completion, or cycles through a scripted list.
pub struct FakeClient {
    pub model: String,
    responses: Mutex<Vec<String>>,
    cursor: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            responses: Mutex::new(vec![
                "Working through the options step by step. <answer>A</answer>".to_string(),
            ]),
            cursor: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        *self.responses.lock().expect("fake responses lock") = vec![text.into()];
        self
    }

    pub fn with_scripted(self, responses: Vec<String>) -> Self {
        *self.responses.lock().expect("fake responses lock") = responses;
        self
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        _prompt: &str,
        _system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().expect("fake responses lock");
        if responses.is_empty() {
            anyhow::bail!("fake client has no scripted responses left");
        }
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst) % responses.len();
        Ok(LlmResponse {
            text: responses[idx].clone(),
            provider: "fake".to_string(),
            model: self.model.clone(),
            meta: serde_json::Value::Null,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_client_cycles_scripted_responses() {
        let client = FakeClient::new("fake-model")
            .with_scripted(vec!["<answer>B</answer>".into(), "<answer>C</answer>".into()]);
        let first = client.complete("p", None).await.unwrap();
        let second = client.complete("p", None).await.unwrap();
        let third = client.complete("p", None).await.unwrap();
        assert_eq!(first.text, "<answer>B</answer>");
        assert_eq!(second.text, "<answer>C</answer>");
        assert_eq!(third.text, "<answer>B</answer>");
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }
}
