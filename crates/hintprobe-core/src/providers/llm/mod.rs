pub mod fake;
pub mod openai;

pub use fake::FakeClient;
pub use openai::OpenAIClient;

use crate::model::LlmResponse;
use async_trait::async_trait;

/// A chat-completion provider. `system` carries optional system messages
/// prepended to the user prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}
