//! # CFP Finder LLM
//!
//! Minimal OpenAI-compatible chat completions client.
//!
//! - [`ChatClient`]: messages, function tools and tool calls over
//!   `/v1/chat/completions`
//! - [`LlmSampler`]: the matching backend used by the MCP server
//! - [`Approver`]: user gate in front of each model call

#![warn(missing_docs)]

pub mod approval;
pub mod chat;
pub mod config;
pub mod error;
pub mod sampler;

pub use approval::{ApprovalRequest, Approver, AutoApprove, DENIED_REPLY};
pub use chat::{ChatClient, ChatMessage, Role, ToolCall, ToolSpec};
pub use config::LlmConfig;
pub use error::{LlmError, LlmResult};
pub use sampler::LlmSampler;
