//! Matching of CFP write-ups against candidate conferences.
//!
//! Each CFP is one batch: a single model request scoring every candidate.
//! Batches run one after another and a failed batch is reported in place,
//! never aborting the others.
//!
//! The model itself sits behind [`SamplingBackend`], so the matcher can be
//! driven by an HTTP chat client, an MCP client's sampling capability, or a
//! canned reply in tests.

mod decode;
mod prompt;

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::cfp::{CfpDocument, CfpLibrary};
use crate::error::CfpResult;
use crate::format::ConferenceView;
use crate::types::Conference;

pub use decode::{decode_candidates, ScoredCandidate};
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};

/// Default minimum score a match must reach.
pub const DEFAULT_MIN_SCORE: u8 = 50;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// One model request.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRequest {
    /// System instructions.
    pub system_prompt: String,
    /// Single user message.
    pub user_prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion budget.
    pub max_tokens: u32,
}

/// Something that can answer a [`SamplingRequest`] with raw text.
#[async_trait]
pub trait SamplingBackend: Send + Sync {
    /// Sends the request and returns the model's reply verbatim.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::Sampling` when the request fails or is refused.
    async fn sample(&self, request: &SamplingRequest) -> CfpResult<String>;
}

/// Asks whether the user wants to apply to a matched conference.
#[async_trait]
pub trait ApplicationDecider: Send + Sync {
    /// `Some(true)` to apply, `Some(false)` to decline, `None` when no
    /// answer was obtained.
    async fn decide(&self, cfp: &CfpDocument, candidate: &ConferenceMatch) -> Option<bool>;
}

/// Decider that never asks; every match stays pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAsk;

#[async_trait]
impl ApplicationDecider for NeverAsk {
    async fn decide(&self, _cfp: &CfpDocument, _candidate: &ConferenceMatch) -> Option<bool> {
        None
    }
}

/// Outcome of the application question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// The user wants to apply.
    Accepted,
    /// The user does not want to apply.
    Declined,
    /// No answer.
    Pending,
}

impl From<Option<bool>> for ApplicationStatus {
    fn from(answer: Option<bool>) -> Self {
        match answer {
            Some(true) => Self::Accepted,
            Some(false) => Self::Declined,
            None => Self::Pending,
        }
    }
}

/// A conference with its score for one CFP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceMatch {
    /// The conference, as rendered for output.
    #[serde(flatten)]
    pub conference: ConferenceView,
    /// Relevance, 0–100.
    pub match_score: u8,
    /// Model's justification.
    pub match_reasoning: String,
    /// Answer to the application question.
    pub application_status: ApplicationStatus,
    /// Raw answer, `null` when pending.
    pub user_wants_to_apply: Option<bool>,
}

/// Result of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfpMatchReport {
    /// CFP title.
    pub cfp_title: String,
    /// Matches at or above the threshold, best first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<ConferenceMatch>>,
    /// Why the batch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CfpMatchReport {
    fn matched(cfp: &CfpDocument, matches: Vec<ConferenceMatch>) -> Self {
        Self {
            cfp_title: cfp.title.clone(),
            matches: Some(matches),
            error: None,
        }
    }

    fn failed(cfp: &CfpDocument, error: String) -> Self {
        Self {
            cfp_title: cfp.title.clone(),
            matches: None,
            error: Some(error),
        }
    }
}

/// Runs matching batches against a sampling backend.
pub struct CfpMatcher<'a> {
    backend: &'a dyn SamplingBackend,
    decider: &'a dyn ApplicationDecider,
    min_score: u8,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> CfpMatcher<'a> {
    /// A matcher with default threshold and sampling settings.
    pub fn new(backend: &'a dyn SamplingBackend, decider: &'a dyn ApplicationDecider) -> Self {
        Self {
            backend,
            decider,
            min_score: DEFAULT_MIN_SCORE,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the minimum score, capped at 100.
    #[must_use]
    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score.min(100);
        self
    }

    /// Overrides temperature and completion budget.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Matches every CFP in `library`, keyed by slug.
    pub async fn match_library(
        &self,
        library: &CfpLibrary,
        candidates: &[&Conference],
    ) -> BTreeMap<String, CfpMatchReport> {
        let mut reports = BTreeMap::new();
        for cfp in library.iter() {
            let report = match self.match_one(cfp, candidates).await {
                Ok(matches) => CfpMatchReport::matched(cfp, matches),
                Err(err) => {
                    warn!("Matching failed for CFP '{}': {err}", cfp.slug);
                    CfpMatchReport::failed(cfp, err.to_string())
                }
            };
            reports.insert(cfp.slug.clone(), report);
        }
        reports
    }

    /// Runs a single batch.
    ///
    /// # Errors
    ///
    /// Propagates backend failures and undecodable replies.
    pub async fn match_one(
        &self,
        cfp: &CfpDocument,
        candidates: &[&Conference],
    ) -> CfpResult<Vec<ConferenceMatch>> {
        if candidates.is_empty() {
            debug!("No candidates for CFP '{}', skipping request", cfp.slug);
            return Ok(Vec::new());
        }

        let request = SamplingRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(cfp, candidates),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let reply = self.backend.sample(&request).await?;
        let scored = decode_candidates(&reply)?;

        let mut matches = Vec::new();
        for candidate in join_by_name(&scored, candidates, self.min_score) {
            let answer = self.decider.decide(cfp, &candidate).await;
            matches.push(ConferenceMatch {
                application_status: answer.into(),
                user_wants_to_apply: answer,
                ..candidate
            });
        }

        info!(
            "CFP '{}': {} of {} candidates scored >= {}",
            cfp.slug,
            matches.len(),
            candidates.len(),
            self.min_score
        );
        Ok(matches)
    }
}

/// Pairs scored names with conferences, drops unknown names and scores below
/// `min_score`, keeps the first score per conference, and sorts best first.
fn join_by_name(
    scored: &[ScoredCandidate],
    candidates: &[&Conference],
    min_score: u8,
) -> Vec<ConferenceMatch> {
    let mut seen = HashSet::new();
    let mut joined = Vec::new();

    for item in scored {
        let Some(conf) = lookup(candidates, &item.name) else {
            debug!("Model returned unknown conference '{}'", item.name);
            continue;
        };
        if !seen.insert(conf.name.as_str()) {
            continue;
        }
        let score = item.clamped_score();
        if score < min_score {
            continue;
        }
        joined.push(ConferenceMatch {
            conference: ConferenceView::from(conf),
            match_score: score,
            match_reasoning: item.reasoning.clone(),
            application_status: ApplicationStatus::Pending,
            user_wants_to_apply: None,
        });
    }

    joined.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    joined
}

fn lookup<'c>(candidates: &[&'c Conference], name: &str) -> Option<&'c Conference> {
    let name = name.trim();
    candidates
        .iter()
        .find(|c| c.name == name)
        .or_else(|| candidates.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
        .copied()
}
