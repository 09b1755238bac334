//! Prompt-injection sanitizer.
//!
//! Strips a fixed list of known instruction-override phrasings (Portuguese
//! and English) from user text before it is embedded in a prompt.
//!
//! **This is a best-effort mitigation, not a security boundary.** It only
//! catches the listed phrasings; injection worded any other way, or in any
//! other language, passes through untouched. Prompts must still be written
//! so that a successful injection can do no more than skew one answer.

use regex::Regex;
use tracing::debug;

/// A named injection pattern.
#[derive(Debug, Clone)]
pub struct InjectionPattern {
    /// Short name for logging.
    pub name: &'static str,
    /// Compiled, case-insensitive regex.
    pub regex: Regex,
}

/// Applied in order. All patterns are word-bounded so that e.g. "contact
/// assistance" is never touched by "act as".
const PATTERNS: &[(&str, &str)] = &[
    // English
    (
        "ignore_previous",
        r"(?i)\bignore\s+(?:all\s+)?(?:of\s+)?(?:the\s+|your\s+)?(?:previous|prior|above|earlier)\s+(?:instructions?|prompts?|rules)\b",
    ),
    ("ignore_above", r"(?i)\bignore\s+(?:everything\s+|all\s+)?(?:the\s+)?above\b"),
    (
        "disregard_previous",
        r"(?i)\bdisregard\s+(?:all\s+)?(?:the\s+|your\s+)?(?:previous|prior|above|earlier)\s+(?:instructions?|prompts?|rules)\b",
    ),
    (
        "forget_everything",
        r"(?i)\bforget\s+(?:everything|all)\s+(?:above|before|previous|you\s+were\s+told)\b",
    ),
    ("act_as", r"(?i)\bact\s+as\b"),
    ("pretend", r"(?i)\bpretend\s+(?:to\s+be|you\s+are)\b"),
    ("you_are_now", r"(?i)\byou\s+are\s+now\b"),
    (
        "new_instructions",
        r"(?i)\byour\s+new\s+instructions?\s+(?:is|are)\b",
    ),
    ("new_instructions_label", r"(?i)\bnew\s+instructions?\s*:"),
    ("system_prompt", r"(?i)\bsystem\s+prompt\b"),
    // Portuguese
    (
        "ignore_anteriores",
        r"(?i)\bignore\s+(?:todas\s+)?(?:as\s+)?instruções\s+anteriores\b",
    ),
    (
        "desconsidere_anteriores",
        r"(?i)\bdesconsidere\s+(?:todas\s+)?(?:as\s+)?instruções(?:\s+anteriores)?\b",
    ),
    (
        "esqueca_tudo",
        r"(?i)\besque[çc]a\s+tudo(?:\s+(?:acima|o\s+que\s+foi\s+dito|que\s+foi\s+dito))?\b",
    ),
    ("aja_como", r"(?i)\b(?:aja|atue)\s+como\b"),
    ("finja", r"(?i)\bfinja\s+(?:ser|que)\b"),
    ("voce_agora_e", r"(?i)\bvoc[êe]\s+agora\s+[ée]\b"),
    (
        "nova_instrucao",
        r"(?i)\b(?:sua\s+nova\s+instrução\s+é|suas\s+novas\s+instruções\s+são)\b",
    ),
    ("novas_instrucoes_label", r"(?i)\bnovas?\s+instruç(?:ão|ões)\s*:"),
    ("prompt_do_sistema", r"(?i)\bprompt\s+do\s+sistema\b"),
];

/// Sanitizes untrusted text destined for an LLM prompt.
pub struct SafetyLayer {
    patterns: Vec<InjectionPattern>,
}

impl SafetyLayer {
    /// Create a safety layer with the built-in bilingual pattern list.
    pub fn new() -> Self {
        let patterns = PATTERNS
            .iter()
            .map(|&(name, pattern)| InjectionPattern {
                name,
                regex: Regex::new(pattern).unwrap(),
            })
            .collect();
        Self { patterns }
    }

    /// Names of the patterns that match `input`.
    pub fn detect_injection(&self, input: &str) -> Vec<&'static str> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(input))
            .map(|p| p.name)
            .collect()
    }

    /// Remove every configured pattern occurrence, then trim.
    ///
    /// Removal repeats until nothing changes, because cutting a match out
    /// can splice together a new one. The result is therefore a fixed point
    /// and sanitizing it again is a no-op.
    pub fn sanitize_input(&self, input: &str) -> String {
        let mut current = input.trim().to_string();
        loop {
            let mut next = current.clone();
            for pattern in &self.patterns {
                next = pattern.regex.replace_all(&next, "").into_owned();
            }
            let next = next.trim().to_string();
            if next == current {
                break;
            }
            current = next;
        }

        if current.len() != input.trim().len() {
            debug!(
                removed_bytes = input.trim().len() - current.len(),
                "Stripped prompt-injection phrasing from input"
            );
        }
        current
    }
}

impl Default for SafetyLayer {
    fn default() -> Self {
        Self::new()
    }
}
