//! LLM-backed reply drafting.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ProcessError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::prompts;
use crate::pipeline::types::{Category, ExtractedContent, Language};

const RESPONSE_TEMPERATURE: f32 = 0.7;
const RESPONSE_MAX_TOKENS: u32 = 1024;

/// Labels some models echo in front of the reply despite instructions.
const ECHOED_PREFIXES: &[&str] = &[
    "resposta sugerida:",
    "resposta:",
    "suggested response:",
    "suggested reply:",
    "reply:",
];

pub struct Responder {
    llm: Arc<dyn LlmProvider>,
    language: Language,
}

impl Responder {
    pub fn new(llm: Arc<dyn LlmProvider>, language: Language) -> Self {
        Self { llm, language }
    }

    /// Draft a reply body for an already classified email.
    pub async fn respond(
        &self,
        content: &ExtractedContent,
        category: Category,
    ) -> Result<String, ProcessError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::response_system_prompt(self.language)),
            ChatMessage::user(prompts::response_user_prompt(content, category, self.language)),
        ])
        .with_temperature(RESPONSE_TEMPERATURE)
        .with_max_tokens(RESPONSE_MAX_TOKENS);

        let response = self.llm.complete(request).await.map_err(|e| {
            warn!(model = self.llm.model_name(), error = %e, "Response generation call failed");
            ProcessError::ModelUnavailable(format!("response generation service failed: {e}"))
        })?;

        debug!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Response generation reply"
        );

        let reply = clean_reply(&response.content);
        if reply.is_empty() {
            warn!(raw_response = %response.content, "Empty generated response");
            return Err(ProcessError::ModelOutputInvalid(
                "failed to generate a valid response from the model".to_string(),
            ));
        }
        Ok(reply)
    }
}

/// Trim and drop an echoed label line such as "Resposta sugerida:".
fn clean_reply(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    for prefix in ECHOED_PREFIXES {
        if lower.starts_with(prefix)
            && let Some(rest) = trimmed.get(prefix.len()..)
        {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pipeline::testing::StubLlm;

    fn content() -> ExtractedContent {
        ExtractedContent {
            body: "Poderiam enviar o status do pedido #1234?".into(),
            attachment: None,
        }
    }

    #[test]
    fn clean_reply_strips_echoed_label() {
        assert_eq!(
            clean_reply("  Resposta sugerida:\nOlá! Segue o status.  "),
            "Olá! Segue o status."
        );
        assert_eq!(clean_reply("Suggested response: Thanks!"), "Thanks!");
        assert_eq!(clean_reply("Olá, obrigado."), "Olá, obrigado.");
    }

    #[tokio::test]
    async fn returns_trimmed_reply_and_sends_category() {
        let llm = Arc::new(StubLlm::replying(["\n  Olá! Verificamos o pedido #1234.  \n"]));
        let responder = Responder::new(llm.clone(), Language::Portuguese);
        let reply = responder.respond(&content(), Category::Productive).await.unwrap();
        assert_eq!(reply, "Olá! Verificamos o pedido #1234.");
        assert!(llm.requests()[0].messages[1].content.contains("Categoria: Produtivo"));
    }

    #[tokio::test]
    async fn blank_reply_is_invalid_output() {
        let llm = Arc::new(StubLlm::replying(["   "]));
        let responder = Responder::new(llm, Language::Portuguese);
        let err = responder.respond(&content(), Category::Productive).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelOutputInvalid);
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable() {
        let llm = Arc::new(StubLlm::failing());
        let responder = Responder::new(llm, Language::English);
        let err = responder.respond(&content(), Category::Productive).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
    }
}
