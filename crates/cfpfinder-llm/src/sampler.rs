//! [`SamplingBackend`] over the chat completions client.

use std::sync::Arc;

use async_trait::async_trait;
use cfpfinder_core::error::{CfpError, CfpResult};
use cfpfinder_core::matching::{SamplingBackend, SamplingRequest};

use crate::approval::{ApprovalRequest, Approver, AutoApprove, DENIED_REPLY};
use crate::chat::{ChatClient, ChatMessage};

/// Answers matching batches with a chat model, optionally gated by an
/// [`Approver`].
///
/// A refused call yields [`DENIED_REPLY`], which the matcher reports as a
/// failed batch.
#[derive(Clone)]
pub struct LlmSampler {
    client: ChatClient,
    approver: Arc<dyn Approver>,
}

impl LlmSampler {
    /// A sampler that never asks.
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            approver: Arc::new(AutoApprove),
        }
    }

    /// Replaces the approver.
    #[must_use]
    pub fn with_approver(mut self, approver: Arc<dyn Approver>) -> Self {
        self.approver = approver;
        self
    }
}

impl std::fmt::Debug for LlmSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSampler")
            .field("model", &self.client.model())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SamplingBackend for LlmSampler {
    async fn sample(&self, request: &SamplingRequest) -> CfpResult<String> {
        let shown = [request.user_prompt.clone()];
        let approval = ApprovalRequest {
            purpose: "cfp matching",
            system_prompt: Some(&request.system_prompt),
            messages: &shown,
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
        };
        if !self.approver.approve(&approval).await {
            tracing::info!("Matching call refused by user");
            return Ok(DENIED_REPLY.to_string());
        }

        let messages = [
            ChatMessage::system(request.system_prompt.as_str()),
            ChatMessage::user(request.user_prompt.as_str()),
        ];
        let reply = self
            .client
            .complete_with(&messages, Some(request.temperature), Some(request.max_tokens))
            .await
            .map_err(CfpError::from)?;

        let text = reply.text_content();
        if text.trim().is_empty() {
            return Err(CfpError::sampling("model returned an empty reply"));
        }
        tracing::debug!(chars = text.len(), "Matching reply received");
        Ok(text.to_string())
    }
}
