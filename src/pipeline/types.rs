//! Shared types for the email processing pipeline.

use std::str::FromStr;

use crate::error::{ConfigError, ProcessError};

// ── Language ────────────────────────────────────────────────────────

/// Language of the prompts and of the category labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Portuguese,
    English,
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "portuguese" => Ok(Self::Portuguese),
            "en" | "en-us" | "english" => Ok(Self::English),
            other => Err(ConfigError::InvalidValue {
                key: "EMAIL_CLASSIFIER_LANGUAGE".to_string(),
                message: format!("unsupported language '{other}' (expected pt or en)"),
            }),
        }
    }
}

// ── Category ────────────────────────────────────────────────────────

/// The two-valued email classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Needs an action or a specific reply.
    Productive,
    /// Courtesy, greetings, noise. No action needed.
    Unproductive,
}

impl Category {
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Productive, Language::Portuguese) => "Produtivo",
            (Self::Unproductive, Language::Portuguese) => "Improdutivo",
            (Self::Productive, Language::English) => "Productive",
            (Self::Unproductive, Language::English) => "Unproductive",
        }
    }

    /// Decode a free-text model reply into a category.
    ///
    /// The productive label is checked first, as a case-sensitive substring,
    /// then the unproductive one. Because the negative labels spell the
    /// positive word in lowercase ("Improdutivo", "Unproductive") they never
    /// match the first check. Anything else is an error; no label is guessed.
    pub fn decode(reply: &str, language: Language) -> Result<Self, ProcessError> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ProcessError::ModelOutputInvalid(
                "could not obtain a classification from the model".to_string(),
            ));
        }

        if reply.contains(Self::Productive.label(language)) {
            Ok(Self::Productive)
        } else if reply.contains(Self::Unproductive.label(language)) {
            Ok(Self::Unproductive)
        } else {
            Err(ProcessError::ModelOutputInvalid(format!(
                "unexpected classification from the model: '{reply}'"
            )))
        }
    }
}

// ── Submission ──────────────────────────────────────────────────────

/// An uploaded file as received by the endpoint.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: Option<String>,
    /// Declared MIME type.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// One email to classify: raw text, a file, or both.
#[derive(Debug, Clone, Default)]
pub struct EmailSubmission {
    pub text: Option<String>,
    pub file: Option<Attachment>,
}

impl EmailSubmission {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn with_file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }
}

// ── Extracted content ───────────────────────────────────────────────

/// Sanitized text ready to be embedded in prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub body: String,
    pub attachment: Option<String>,
}

impl ExtractedContent {
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
            && self
                .attachment
                .as_deref()
                .is_none_or(|a| a.trim().is_empty())
    }

    /// Body followed by the attachment text under a labeled separator.
    pub fn combined(&self, language: Language) -> String {
        match self.attachment.as_deref() {
            Some(attachment) if !attachment.trim().is_empty() => {
                let label = match language {
                    Language::Portuguese => "Texto contido no anexo:",
                    Language::English => "Text contained in the attachment:",
                };
                format!("{}\n\n{}\n{}", self.body, label, attachment)
            }
            _ => self.body.clone(),
        }
    }
}

// ── Result ──────────────────────────────────────────────────────────

/// Outcome of processing one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub category: Category,
    pub suggested_response: String,
}
