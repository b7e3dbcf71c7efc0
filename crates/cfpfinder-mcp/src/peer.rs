//! Matching through the connected MCP client.
//!
//! When the client advertises sampling, CFP batches are sent back to it with
//! `sampling/createMessage` so the client decides which model answers (and
//! whether to ask its user first). When it advertises elicitation, every
//! match is turned into a yes/no question for the user.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rmcp::model::{
    Content, CreateElicitationRequestParam, CreateMessageRequestParam, ElicitationAction,
    ElicitationSchema, Role, SamplingMessage,
};
use rmcp::{Peer, RoleServer};

use cfpfinder_core::cfp::CfpDocument;
use cfpfinder_core::error::{CfpError, CfpResult};
use cfpfinder_core::matching::{ApplicationDecider, ConferenceMatch, SamplingBackend, SamplingRequest};

/// Property of the elicitation schema holding the answer.
pub const APPLY_FIELD: &str = "value";

/// Whether the client declared the sampling capability.
pub fn supports_sampling(peer: &Peer<RoleServer>) -> bool {
    peer.peer_info()
        .is_some_and(|info| info.capabilities.sampling.is_some())
}

/// Whether the client declared the elicitation capability.
pub fn supports_elicitation(peer: &Peer<RoleServer>) -> bool {
    peer.peer_info()
        .is_some_and(|info| info.capabilities.elicitation.is_some())
}

/// [`SamplingBackend`] that delegates to the client's model.
#[derive(Clone)]
pub struct PeerSampler {
    peer: Peer<RoleServer>,
}

impl PeerSampler {
    /// Wraps the requesting client's peer handle.
    pub fn new(peer: Peer<RoleServer>) -> Self {
        Self { peer }
    }
}

/// Builds the `sampling/createMessage` parameters for one batch.
pub fn create_message_params(request: &SamplingRequest) -> CreateMessageRequestParam {
    CreateMessageRequestParam {
        messages: vec![SamplingMessage {
            role: Role::User,
            content: Content::text(request.user_prompt.clone()),
        }],
        model_preferences: None,
        system_prompt: Some(request.system_prompt.clone()),
        include_context: None,
        temperature: Some(request.temperature),
        max_tokens: request.max_tokens,
        stop_sequences: None,
        metadata: None,
    }
}

#[async_trait]
impl SamplingBackend for PeerSampler {
    async fn sample(&self, request: &SamplingRequest) -> CfpResult<String> {
        let result = self
            .peer
            .create_message(create_message_params(request))
            .await
            .map_err(|e| CfpError::sampling(format!("client sampling failed: {e}")))?;

        let text = result
            .message
            .content
            .as_text()
            .map(|t| t.text.clone())
            .ok_or_else(|| CfpError::sampling("client sampling returned no text"))?;
        tracing::debug!(model = %result.model, chars = text.len(), "Client sampling reply");
        Ok(text)
    }
}

/// Question asked for one match.
pub fn application_question(cfp: &CfpDocument, candidate: &ConferenceMatch) -> String {
    let view = &candidate.conference;
    let deadline = view
        .cfp
        .as_ref()
        .and_then(|c| c.until_date.as_deref())
        .unwrap_or("unknown");
    format!(
        "CFP \"{}\" matches {} ({}, {}) with a score of {}/100.\n{}\nCFP deadline: {}\n\
         Do you want to apply to this conference?",
        cfp.title,
        view.name,
        view.date_formatted.as_deref().unwrap_or("undated"),
        view.location,
        candidate.match_score,
        candidate.match_reasoning,
        deadline
    )
}

/// [`ApplicationDecider`] that asks the client's user through elicitation.
///
/// A cancelled question stops the remaining questions of the call; those
/// matches stay pending.
pub struct PeerElicitor {
    peer: Peer<RoleServer>,
    cancelled: AtomicBool,
}

impl PeerElicitor {
    /// Wraps the requesting client's peer handle.
    pub fn new(peer: Peer<RoleServer>) -> Self {
        Self {
            peer,
            cancelled: AtomicBool::new(false),
        }
    }
}

fn apply_schema() -> Result<ElicitationSchema, &'static str> {
    ElicitationSchema::builder()
        .required_bool(APPLY_FIELD)
        .description("true to apply, false otherwise")
        .build()
}

#[async_trait]
impl ApplicationDecider for PeerElicitor {
    async fn decide(&self, cfp: &CfpDocument, candidate: &ConferenceMatch) -> Option<bool> {
        if self.cancelled.load(Ordering::Relaxed) {
            return None;
        }
        let requested_schema = match apply_schema() {
            Ok(schema) => schema,
            Err(err) => {
                tracing::warn!("Invalid elicitation schema: {err}");
                return None;
            }
        };

        let response = self
            .peer
            .create_elicitation(CreateElicitationRequestParam {
                message: application_question(cfp, candidate),
                requested_schema,
            })
            .await;

        match response {
            Ok(result) => match result.action {
                ElicitationAction::Accept => {
                    let answer = result
                        .content
                        .as_ref()
                        .and_then(|c| c.get(APPLY_FIELD))
                        .and_then(serde_json::Value::as_bool);
                    tracing::info!(conference = %candidate.conference.name, ?answer, "Application answer");
                    answer
                }
                ElicitationAction::Decline => None,
                ElicitationAction::Cancel => {
                    tracing::info!(cfp = %cfp.slug, "Application questions cancelled");
                    self.cancelled.store(true, Ordering::Relaxed);
                    None
                }
            },
            Err(err) => {
                tracing::warn!(conference = %candidate.conference.name, "Elicitation failed: {err}");
                None
            }
        }
    }
}
