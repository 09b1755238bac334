//! Email Classifier — classify an email and draft a reply with an LLM.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod safety;
