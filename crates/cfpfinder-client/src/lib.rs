//! # CFP Finder Client
//!
//! Orchestrator that fetches a prompt from the CFP Finder MCP server, lets a
//! chat model pick tool calls, executes them over MCP and prints the model's
//! final answer.
//!
//! While a tool runs the server may call back into the client: sampling
//! requests are confirmed with the user and answered by the same chat model,
//! and yes/no questions are put to the user (see [`handler`]).

#![warn(missing_docs)]

pub mod approver;
pub mod content;
pub mod handler;
pub mod orchestrator;
pub mod session;

pub use approver::{DeclineQuestions, QuestionAnswer, QuestionResponder, StdinApprover};
pub use content::ContentKind;
pub use handler::FinderClient;
pub use orchestrator::{Orchestrator, Outcome, ToolExecutor};
pub use session::McpSession;
