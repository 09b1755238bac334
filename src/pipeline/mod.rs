//! Email processing pipeline.
//!
//! Every submission flows through:
//! 1. `extract` — attachment text (PDF or plain text)
//! 2. `SafetyLayer::sanitize_input()` — strip known injection phrasing
//! 3. `Classifier::classify()` — LLM call, decoded into `Category`
//! 4. `Responder::respond()` — LLM call, trimmed reply body
//!
//! `EmailProcessor` wires the steps together.

pub mod classifier;
pub mod extract;
pub mod processor;
pub mod prompts;
pub mod responder;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use processor::EmailProcessor;
pub use types::{Attachment, Category, EmailSubmission, ExtractedContent, Language, ProcessingResult};
