//! Prompt -> model -> tool calls -> model loop.
//!
//! The first model call sees the prompt and the tool specs and decides which
//! tools to call. Each call is executed, its result fed back as a tool
//! message, and a second call (without tools) writes the final answer.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cfpfinder_llm::{ApprovalRequest, Approver, ChatClient, ChatMessage, LlmResult, ToolSpec, DENIED_REPLY};
use serde_json::{Map, Value};

/// Tool results longer than this (in characters) are not sent to the model.
pub const TOOL_RESULT_LIMIT: usize = 10_000;

/// Executes a named tool with JSON arguments.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Runs the tool and returns its text output.
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> anyhow::Result<String>;
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered without calling tools.
    Direct {
        /// Answer text.
        content: String,
    },
    /// The model called tools, then answered.
    ToolResult {
        /// Final answer text.
        content: String,
        /// Full output of each tool, by tool name.
        raw_tool_results: BTreeMap<String, String>,
    },
}

impl Outcome {
    /// Final answer text.
    pub fn content(&self) -> &str {
        match self {
            Self::Direct { content } | Self::ToolResult { content, .. } => content,
        }
    }
}

/// What the model sees of a tool result.
pub fn llm_view(result: &str) -> String {
    let size = result.chars().count();
    if size > TOOL_RESULT_LIMIT {
        format!(
            "Result too large to include in full. Size: {size} characters. \
             The data was kept and will be processed directly by the client."
        )
    } else {
        result.to_string()
    }
}

/// Drives one prompt through the model and the tools.
pub struct Orchestrator {
    llm: ChatClient,
    approver: Arc<dyn Approver>,
}

impl Orchestrator {
    /// Creates an orchestrator; every model call goes through `approver`.
    pub fn new(llm: ChatClient, approver: Arc<dyn Approver>) -> Self {
        Self { llm, approver }
    }

    /// Runs `prompt_text` with `tools` available.
    ///
    /// A refused model call ends the run with the refusal as its content.
    pub async fn run(
        &self,
        prompt_text: &str,
        tools: &[ToolSpec],
        executor: &dyn ToolExecutor,
    ) -> LlmResult<Outcome> {
        let mut messages = vec![ChatMessage::user(prompt_text)];

        if !self.ask("tool selection", &messages).await {
            return Ok(Outcome::Direct {
                content: DENIED_REPLY.to_string(),
            });
        }
        tracing::info!(tools = tools.len(), "Sending prompt to the model");
        let reply = self.llm.complete(&messages, tools).await?;

        let calls = reply.calls().to_vec();
        if calls.is_empty() {
            return Ok(Outcome::Direct {
                content: reply.text_content().to_string(),
            });
        }
        tracing::info!(count = calls.len(), "Model requested tool calls");
        messages.push(reply);

        let mut raw_tool_results = BTreeMap::new();
        for call in &calls {
            let name = &call.function.name;
            let outcome = match call.arguments() {
                Ok(arguments) => {
                    let shown = Value::Object(arguments.clone());
                    tracing::info!(tool = %name, arguments = %shown, "Calling tool");
                    executor.call_tool(name, arguments).await
                }
                Err(err) => Err(err.into()),
            };
            let for_model = match outcome {
                Ok(text) => {
                    tracing::info!(tool = %name, chars = text.chars().count(), "Tool result received");
                    let view = llm_view(&text);
                    raw_tool_results.insert(name.clone(), text);
                    view
                }
                Err(err) => {
                    tracing::warn!(tool = %name, "Tool call failed: {err:#}");
                    format!("Error: {err:#}")
                }
            };
            messages.push(ChatMessage::tool_result(call, for_model));
        }

        let content = if self.ask("narrative", &messages).await {
            tracing::info!("Model analysing tool results");
            self.llm.complete(&messages, &[]).await?.text_content().to_string()
        } else {
            DENIED_REPLY.to_string()
        };

        Ok(Outcome::ToolResult {
            content,
            raw_tool_results,
        })
    }

    async fn ask(&self, purpose: &str, messages: &[ChatMessage]) -> bool {
        let shown: Vec<String> = messages
            .iter()
            .map(|m| m.text_content().to_string())
            .collect();
        let request = ApprovalRequest {
            purpose,
            system_prompt: None,
            messages: &shown,
            temperature: None,
            max_tokens: None,
        };
        self.approver.approve(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_results_pass_through() {
        assert_eq!(llm_view("[]"), "[]");
        let exact = "a".repeat(TOOL_RESULT_LIMIT);
        assert_eq!(llm_view(&exact), exact);
    }

    #[test]
    fn test_large_results_become_a_note() {
        let big = "a".repeat(TOOL_RESULT_LIMIT + 1);
        let view = llm_view(&big);
        assert!(view.contains("10001 characters"));
        assert!(view.len() < 200);
    }

    #[test]
    fn test_outcome_content() {
        let outcome = Outcome::ToolResult {
            content: "done".into(),
            raw_tool_results: BTreeMap::new(),
        };
        assert_eq!(outcome.content(), "done");
    }
}
