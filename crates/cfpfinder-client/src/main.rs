//! CFP Finder Client - prompt -> LLM -> tool call orchestrator
//!
//! # Usage
//!
//! ```bash
//! cfpfinder-mcp-server --http --port 8000 &
//! cfpfinder-client --country France
//! cfpfinder-client --prompt conferences_by_month --month June --yes
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cfpfinder_client::{
    DeclineQuestions, FinderClient, McpSession, Orchestrator, Outcome, QuestionResponder,
    StdinApprover,
};
use cfpfinder_llm::{Approver, AutoApprove, ChatClient, LlmConfig};

/// CFP Finder orchestrator client
#[derive(Parser, Debug)]
#[command(name = "cfpfinder-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// MCP endpoint of the server
    #[arg(long, default_value = "http://127.0.0.1:8000/mcp")]
    server_url: String,

    /// Base URL of the OpenAI-compatible chat endpoint
    #[arg(long, default_value = "http://localhost:4141")]
    llm_url: String,

    /// Model name
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Server prompt to run
    #[arg(long, default_value = "find_conferences_for_open_cfps")]
    prompt: String,

    /// Country argument of the prompt
    #[arg(long, default_value = "France")]
    country: String,

    /// Month argument (conferences_by_month only)
    #[arg(long)]
    month: Option<String>,

    /// Approve every server sampling request and decline every server
    /// question without asking
    #[arg(short, long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn prompt_arguments(&self) -> Map<String, Value> {
        let mut arguments = Map::new();
        arguments.insert("country".into(), Value::String(self.country.clone()));
        if let Some(month) = &self.month {
            arguments.insert("month".into(), Value::String(month.clone()));
        }
        arguments
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("cfpfinder_client=debug,cfpfinder_llm=debug,rmcp=info")
        })
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("cfpfinder_client=info,cfpfinder_llm=warn,rmcp=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let llm = ChatClient::from_config(&LlmConfig {
        base_url: args.llm_url.clone(),
        model: args.model.clone(),
        ..LlmConfig::default()
    })?;
    let (approver, responder): (Arc<dyn Approver>, Arc<dyn QuestionResponder>) = if args.yes {
        (Arc::new(AutoApprove), Arc::new(DeclineQuestions))
    } else {
        (Arc::new(StdinApprover), Arc::new(StdinApprover))
    };
    let handler = FinderClient::new(llm.clone(), approver, responder);

    let session = McpSession::connect(&args.server_url, handler)
        .await
        .with_context(|| format!("connecting to MCP server at {}", args.server_url))?;

    let prompt_text = session
        .prompt_text(&args.prompt, args.prompt_arguments())
        .await
        .with_context(|| format!("fetching prompt '{}'", args.prompt))?;
    println!("Prompt from server:\n{prompt_text}\n");

    let tools = session.tool_specs().await.context("listing tools")?;
    for tool in &tools {
        println!("  tool: {} - {}", tool.function.name, tool.function.description);
    }

    let orchestrator = Orchestrator::new(llm, Arc::new(AutoApprove));
    let outcome = orchestrator
        .run(&prompt_text, &tools, &session)
        .await
        .with_context(|| format!("running prompt against {}", args.llm_url))?;

    if let Outcome::ToolResult {
        raw_tool_results, ..
    } = &outcome
    {
        for (tool, result) in raw_tool_results {
            tracing::info!(tool = %tool, chars = result.chars().count(), "Raw tool result kept");
        }
    }

    println!("\nFinal answer:\n{}", outcome.content());
    session.close().await
}
