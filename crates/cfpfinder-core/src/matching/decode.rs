//! Decoding of free-form model output into scored candidates.
//!
//! The model is asked for a JSON array but nothing guarantees it. Decoding
//! tries, in order:
//!
//! 1. the whole reply as JSON
//! 2. the first fenced code block
//! 3. the outermost `[...]`, then the outermost `{...}`
//!
//! and gives up with `CfpError::Decode` when none parses.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{CfpError, CfpResult};

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("fenced block pattern is valid")
});

/// One conference the model scored for a CFP.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredCandidate {
    /// Conference name as echoed by the model.
    #[serde(alias = "conference", alias = "conference_name")]
    pub name: String,
    /// Relevance, nominally 0–100.
    #[serde(alias = "match_score")]
    pub score: f64,
    /// Short justification.
    #[serde(default, alias = "match_reasoning", alias = "reason")]
    pub reasoning: String,
}

impl ScoredCandidate {
    /// Score clamped to 0–100 and rounded.
    #[must_use]
    pub fn clamped_score(&self) -> u8 {
        if self.score.is_nan() {
            return 0;
        }
        // Clamped to [0, 100] so the cast cannot truncate.
        self.score.clamp(0.0, 100.0).round() as u8
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<ScoredCandidate>),
    Wrapped { matches: Vec<ScoredCandidate> },
    Failure { error: String },
}

/// Decodes a model reply.
///
/// # Errors
///
/// Returns `CfpError::Sampling` when the reply is an `{"error": ...}` object
/// and `CfpError::Decode` when no stage yields valid JSON.
pub fn decode_candidates(raw: &str) -> CfpResult<Vec<ScoredCandidate>> {
    let stages = [
        ("direct", Some(raw.trim())),
        ("fenced", fenced_block(raw)),
        ("array scan", outermost(raw, '[', ']')),
        ("object scan", outermost(raw, '{', '}')),
    ];

    for (stage, text) in stages {
        let Some(text) = text else { continue };
        match serde_json::from_str::<Payload>(text) {
            Ok(Payload::List(items) | Payload::Wrapped { matches: items }) => {
                debug!("Decoded {} candidates ({stage})", items.len());
                return Ok(items);
            }
            Ok(Payload::Failure { error }) => return Err(CfpError::sampling(error)),
            Err(err) => debug!("Decode stage '{stage}' failed: {err}"),
        }
    }

    Err(CfpError::decode(format!(
        "no JSON payload found in a {}-character reply",
        raw.chars().count()
    )))
}

fn fenced_block(raw: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn outermost(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then(|| &raw[start..=end])
}
