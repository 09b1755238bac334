//! LLM-backed two-way email classifier.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ProcessError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::prompts;
use crate::pipeline::types::{Category, ExtractedContent, Language};

/// Near-deterministic sampling for a one-word answer.
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// The answer is a single word; leave room for a stray sentence.
const CLASSIFY_MAX_TOKENS: u32 = 16;

pub struct Classifier {
    llm: Arc<dyn LlmProvider>,
    language: Language,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmProvider>, language: Language) -> Self {
        Self { llm, language }
    }

    /// Ask the model for a category and decode its reply.
    pub async fn classify(&self, content: &ExtractedContent) -> Result<Category, ProcessError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::classification_system_prompt(self.language)),
            ChatMessage::user(prompts::classification_user_prompt(content, self.language)),
        ])
        .with_temperature(CLASSIFY_TEMPERATURE)
        .with_max_tokens(CLASSIFY_MAX_TOKENS);

        let response = self.llm.complete(request).await.map_err(|e| {
            warn!(model = self.llm.model_name(), error = %e, "Classification call failed");
            ProcessError::ModelUnavailable(format!("classification service failed: {e}"))
        })?;

        debug!(
            raw = %response.content,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Classification reply"
        );

        Category::decode(&response.content, self.language).inspect_err(|e| {
            warn!(raw_response = %response.content, error = %e, "Undecodable classification");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pipeline::testing::StubLlm;

    fn content(body: &str) -> ExtractedContent {
        ExtractedContent {
            body: body.to_string(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn decodes_portuguese_labels() {
        let llm = Arc::new(StubLlm::replying(["Improdutivo"]));
        let classifier = Classifier::new(llm.clone(), Language::Portuguese);
        let category = classifier.classify(&content("Feliz Natal a todos!")).await.unwrap();
        assert_eq!(category, Category::Unproductive);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(CLASSIFY_TEMPERATURE));
        assert!(requests[0].messages[1].content.contains("Feliz Natal a todos!"));
    }

    #[tokio::test]
    async fn unclear_reply_is_invalid_output() {
        let llm = Arc::new(StubLlm::replying(["Unclear"]));
        let classifier = Classifier::new(llm, Language::English);
        let err = classifier.classify(&content("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelOutputInvalid);
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable() {
        let llm = Arc::new(StubLlm::failing());
        let classifier = Classifier::new(llm, Language::Portuguese);
        let err = classifier.classify(&content("hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert!(err.to_string().contains("classification service failed"));
    }
}
