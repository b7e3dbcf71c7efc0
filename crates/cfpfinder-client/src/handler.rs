//! Callbacks the server may invoke while a tool runs.
//!
//! CFP matching asks the client to sample (the user confirms, then the
//! configured chat model answers) and asks the user, through elicitation,
//! whether to apply to each matched conference.

use std::sync::Arc;

use cfpfinder_llm::{ApprovalRequest, Approver, ChatClient, ChatMessage, DENIED_REPLY};
use rmcp::model::{
    ClientCapabilities, ClientInfo, Content, CreateElicitationRequestParam,
    CreateElicitationResult, CreateMessageRequestParam, CreateMessageResult, ElicitationAction,
    Implementation, PrimitiveSchema, Role, SamplingMessage,
};
use rmcp::service::RequestContext;
use rmcp::{ClientHandler, ErrorData as McpError, RoleClient};
use serde_json::json;

use crate::approver::{QuestionAnswer, QuestionResponder};
use crate::content::collect_text;

/// Client-side handler: confirms and runs sampling requests, answers
/// elicitation questions.
#[derive(Clone)]
pub struct FinderClient {
    llm: ChatClient,
    approver: Arc<dyn Approver>,
    responder: Arc<dyn QuestionResponder>,
}

impl FinderClient {
    /// Creates the handler.
    pub fn new(
        llm: ChatClient,
        approver: Arc<dyn Approver>,
        responder: Arc<dyn QuestionResponder>,
    ) -> Self {
        Self {
            llm,
            approver,
            responder,
        }
    }

    async fn sample(&self, params: &CreateMessageRequestParam, texts: &[String]) -> String {
        let mut messages = Vec::with_capacity(texts.len() + 1);
        if let Some(system) = &params.system_prompt {
            messages.push(ChatMessage::system(system.as_str()));
        }
        for (message, text) in params.messages.iter().zip(texts) {
            messages.push(match message.role {
                Role::User => ChatMessage::user(text.as_str()),
                Role::Assistant => ChatMessage::assistant(text.as_str()),
            });
        }

        match self
            .llm
            .complete_with(&messages, params.temperature, Some(params.max_tokens))
            .await
        {
            Ok(reply) => {
                let text = reply.text_content().to_string();
                tracing::info!(chars = text.chars().count(), "Sampling reply received");
                text
            }
            Err(err) => {
                tracing::warn!("Sampling call failed: {err}");
                json!({ "error": format!("LLM call failed: {err}") }).to_string()
            }
        }
    }
}

/// Name of the first boolean property of an elicitation schema.
fn boolean_field(request: &CreateElicitationRequestParam) -> Option<&str> {
    request
        .requested_schema
        .properties
        .iter()
        .find(|(_, schema)| matches!(schema, PrimitiveSchema::Boolean(_)))
        .map(|(name, _)| name.as_str())
}

/// Maps a user answer to an elicitation result.
pub fn elicitation_result(
    request: &CreateElicitationRequestParam,
    answer: QuestionAnswer,
) -> CreateElicitationResult {
    let accept = |value: bool| match boolean_field(request) {
        Some(field) => CreateElicitationResult {
            action: ElicitationAction::Accept,
            content: Some(json!({ field: value })),
        },
        None => CreateElicitationResult {
            action: ElicitationAction::Decline,
            content: None,
        },
    };
    match answer {
        QuestionAnswer::Yes => accept(true),
        QuestionAnswer::No => accept(false),
        QuestionAnswer::Decline => CreateElicitationResult {
            action: ElicitationAction::Decline,
            content: None,
        },
        QuestionAnswer::Cancel => CreateElicitationResult {
            action: ElicitationAction::Cancel,
            content: None,
        },
    }
}

impl ClientHandler for FinderClient {
    async fn create_message(
        &self,
        params: CreateMessageRequestParam,
        _context: RequestContext<RoleClient>,
    ) -> Result<CreateMessageResult, McpError> {
        let texts: Vec<String> = params
            .messages
            .iter()
            .map(|m| collect_text(std::slice::from_ref(&m.content)))
            .collect();
        let approval = ApprovalRequest {
            purpose: "server sampling",
            system_prompt: params.system_prompt.as_deref(),
            messages: &texts,
            temperature: params.temperature,
            max_tokens: Some(params.max_tokens),
        };

        let reply = if self.approver.approve(&approval).await {
            self.sample(&params, &texts).await
        } else {
            tracing::info!("Sampling refused by user");
            DENIED_REPLY.to_string()
        };

        Ok(CreateMessageResult {
            model: self.llm.model().to_string(),
            stop_reason: Some(CreateMessageResult::STOP_REASON_END_TURN.to_string()),
            message: SamplingMessage {
                role: Role::Assistant,
                content: Content::text(reply),
            },
        })
    }

    async fn create_elicitation(
        &self,
        request: CreateElicitationRequestParam,
        _context: RequestContext<RoleClient>,
    ) -> Result<CreateElicitationResult, McpError> {
        let answer = self.responder.respond(&request.message).await;
        Ok(elicitation_result(&request, answer))
    }

    fn get_info(&self) -> ClientInfo {
        ClientInfo {
            capabilities: ClientCapabilities::builder()
                .enable_sampling()
                .enable_elicitation()
                .build(),
            client_info: Implementation {
                name: "cfpfinder-client".to_string(),
                title: Some("CFP Finder Client".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            ..ClientInfo::default()
        }
    }
}
