//! Streamable HTTP session with the MCP server.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cfpfinder_llm::ToolSpec;
use rmcp::{
    model::{CallToolRequestParam, GetPromptRequestParam, PromptMessageContent},
    service::RunningService,
    transport::streamable_http_client::{
        StreamableHttpClientTransport, StreamableHttpClientTransportConfig,
    },
    RoleClient, ServiceExt,
};
use serde_json::{Map, Value};

use crate::content::collect_text;
use crate::handler::FinderClient;
use crate::orchestrator::ToolExecutor;

/// Connected MCP client.
pub struct McpSession {
    client: RunningService<RoleClient, FinderClient>,
}

impl McpSession {
    /// Connect to an MCP server over streamable HTTP.
    ///
    /// `handler` answers the server's sampling and elicitation requests for
    /// the lifetime of the session.
    pub async fn connect(url: &str, handler: FinderClient) -> Result<Self> {
        let http_client = reqwest::Client::new();
        let config = StreamableHttpClientTransportConfig::with_uri(url);
        let transport = StreamableHttpClientTransport::with_client(http_client, config);
        let client = handler.serve(transport).await?;
        tracing::info!(url, "Connected to MCP server");
        Ok(Self { client })
    }

    /// Fetches a prompt and returns the text of its last text message.
    pub async fn prompt_text(&self, name: &str, arguments: Map<String, Value>) -> Result<String> {
        let result = self
            .client
            .get_prompt(GetPromptRequestParam {
                name: name.into(),
                arguments: Some(arguments),
            })
            .await?;

        result
            .messages
            .iter()
            .filter_map(|m| match &m.content {
                PromptMessageContent::Text { text } => Some(text.clone()),
                _ => None,
            })
            .last()
            .ok_or_else(|| anyhow!("Prompt '{name}' has no text message"))
    }

    /// Server tools in chat completions format.
    pub async fn tool_specs(&self) -> Result<Vec<ToolSpec>> {
        let tools = self.client.list_all_tools().await?;
        Ok(tools
            .into_iter()
            .map(|tool| {
                ToolSpec::function(
                    tool.name.to_string(),
                    tool.description.as_deref().unwrap_or_default(),
                    Value::Object(tool.input_schema.as_ref().clone()),
                )
            })
            .collect())
    }

    /// Closes the session.
    pub async fn close(self) -> Result<()> {
        self.client.cancel().await?;
        Ok(())
    }
}

#[async_trait]
impl ToolExecutor for McpSession {
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<String> {
        let result = self
            .client
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await?;

        let text = collect_text(&result.content);
        if result.is_error == Some(true) {
            return Err(anyhow!("Tool '{name}' failed: {text}"));
        }
        Ok(text)
    }
}
