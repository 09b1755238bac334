//! Email processor — extract, sanitize, classify, draft a reply.
//!
//! Flow (single pass, no retries):
//! 1. Validate that text or a file was submitted
//! 2. Reject unsupported attachment types
//! 3. Extract attachment text on the blocking pool
//! 4. Sanitize and reject blank content
//! 5. Cap body and attachment text at `MAX_PROMPT_CHARS` each
//! 6. Classify, then draft a reply using the category

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ProcessError;
use crate::llm::provider::LlmProvider;
use crate::pipeline::classifier::Classifier;
use crate::pipeline::extract::{AttachmentKind, extract_attachment_blocking};
use crate::pipeline::responder::Responder;
use crate::pipeline::types::{EmailSubmission, ExtractedContent, Language, ProcessingResult};
use crate::safety::SafetyLayer;

/// Body and attachment text are each cut to this many characters before
/// prompting, to stay inside the model context window.
pub const MAX_PROMPT_CHARS: usize = 8000;

/// Runs one email submission through the whole pipeline.
///
/// Holds no per-request state; a single instance is shared by all requests.
pub struct EmailProcessor {
    classifier: Classifier,
    responder: Responder,
    safety: Arc<SafetyLayer>,
    language: Language,
}

impl EmailProcessor {
    pub fn new(llm: Arc<dyn LlmProvider>, safety: Arc<SafetyLayer>, language: Language) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&llm), language),
            responder: Responder::new(llm, language),
            safety,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Process a single submission.
    pub async fn process(
        &self,
        submission: EmailSubmission,
    ) -> Result<ProcessingResult, ProcessError> {
        let content = self.prepare(submission).await?;

        info!(
            body_chars = content.body.chars().count(),
            has_attachment = content.attachment.is_some(),
            "Classifying email"
        );
        let category = self.classifier.classify(&content).await?;
        info!(category = category.label(self.language), "Email classified");

        let suggested_response = self.responder.respond(&content, category).await?;
        info!(
            category = category.label(self.language),
            reply_chars = suggested_response.chars().count(),
            "Suggested response generated"
        );

        Ok(ProcessingResult {
            category,
            suggested_response,
        })
    }

    /// Validation, extraction and sanitization.
    async fn prepare(&self, submission: EmailSubmission) -> Result<ExtractedContent, ProcessError> {
        let EmailSubmission { text, file } = submission;
        let text = text.filter(|t| !t.is_empty());

        if text.is_none() && file.is_none() {
            return Err(ProcessError::BadInput("no content provided".to_string()));
        }

        let attachment = match file {
            Some(file) => {
                AttachmentKind::detect(&file)?;
                Some(extract_attachment_blocking(file).await?)
            }
            None => None,
        };

        let body = self.sanitize(text.as_deref().unwrap_or(""), "body");
        let attachment = attachment
            .map(|a| self.sanitize(&a, "attachment"))
            .filter(|a| !a.is_empty());

        let content = ExtractedContent { body, attachment };
        if content.is_blank() {
            return Err(ProcessError::BadInput("empty content".to_string()));
        }
        Ok(ExtractedContent {
            body: limit_for_prompt(content.body, "body"),
            attachment: content.attachment.map(|a| limit_for_prompt(a, "attachment")),
        })
    }

    fn sanitize(&self, input: &str, part: &'static str) -> String {
        let matched = self.safety.detect_injection(input);
        if !matched.is_empty() {
            warn!(part, patterns = ?matched, "Possible prompt injection in email");
        }
        self.safety.sanitize_input(input)
    }
}

/// Keep the first `MAX_PROMPT_CHARS` characters, logging when text is dropped.
fn limit_for_prompt(mut text: String, part: &'static str) -> String {
    let cut = text.char_indices().nth(MAX_PROMPT_CHARS).map(|(i, _)| i);
    if let Some(cut) = cut {
        let original_chars = text.chars().count();
        text.truncate(cut);
        warn!(
            part,
            original_chars,
            kept_chars = MAX_PROMPT_CHARS,
            "Email text exceeds the prompt limit, truncating"
        );
    }
    text
}
