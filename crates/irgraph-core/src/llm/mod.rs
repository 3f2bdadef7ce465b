mod claude;
mod error;
mod openai;
mod provider;

pub use claude::ClaudeClient;
pub use error::LLMError;
pub use openai::OpenAIClient;
pub use provider::Provider;

use async_trait::async_trait;

/// Trait for Large Language Model providers.
///
/// The planner, explorer and playbook stages only need single-shot
/// completions, so this is all a provider has to implement.
///
/// # Supported Providers
///
/// - **OpenAI-compatible** (default): OpenAI, Azure, vLLM, llama.cpp, etc.
/// - **Anthropic**: Claude models via the Messages API
/// - **Ollama**: local models through Ollama's OpenAI-compatible endpoint
/// - **OpenRouter**: hosted models through OpenRouter
///
/// # Example
///
/// ```ignore
/// use irgraph_core::config::LLMConfig;
/// use irgraph_core::llm::{Provider, LLM};
///
/// let llm = Provider::from_config(&LLMConfig::default()).build()?;
/// let response = llm.complete_with_system("You are terse.", "Hello!").await?;
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Complete a prompt and return the response.
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;

    /// Complete a prompt with a system message.
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, LLMError>;

    /// Model identifier, for logs and run metadata.
    fn model(&self) -> &str;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[async_trait]
impl<'a, T: LLM + ?Sized> LLM for &'a T {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[async_trait]
impl<T: LLM + ?Sized> LLM for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
