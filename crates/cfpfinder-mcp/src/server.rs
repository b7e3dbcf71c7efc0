//! MCP server implementation for CFP Finder.

use std::sync::Arc;

use chrono::Datelike;
use rmcp::handler::server::router::prompt::PromptRouter;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
    ListPromptsResult, ListResourcesResult, PaginatedRequestParam, PromptMessage,
    PromptMessageRole, ProtocolVersion, RawResource, ReadResourceRequestParam, ReadResourceResult,
    Resource, ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::schemars::JsonSchema;
use rmcp::serde::{Deserialize, Serialize};
use rmcp::service::RequestContext;
use rmcp::{
    prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router,
    ErrorData as McpError, Peer, RoleServer, ServerHandler,
};

use cfpfinder_core::agenda::Agenda;
use cfpfinder_core::cfp::CfpLibrary;
use cfpfinder_core::error::CfpError;
use cfpfinder_core::format::{render_text, to_views};
use cfpfinder_core::matching::{
    ApplicationDecider, CfpMatcher, NeverAsk, SamplingBackend, DEFAULT_MAX_TOKENS,
    DEFAULT_MIN_SCORE, DEFAULT_TEMPERATURE,
};
use cfpfinder_core::parser::parse_month;
use cfpfinder_core::prompts;
use cfpfinder_core::query::ConferenceQuery;
use cfpfinder_core::tags::TAG_KEYWORDS;
use cfpfinder_core::types::Timestamp;

use crate::peer::{supports_elicitation, supports_sampling, PeerElicitor, PeerSampler};
use crate::{SERVER_NAME, SERVER_VERSION};

/// URI scheme of CFP resources.
pub const CFP_URI_PREFIX: &str = "cfp://";
/// URI of the tag table resource.
pub const TAGS_URI: &str = "conferences://tags";

/// MCP server over one agenda and one CFP library.
///
/// Cheap to clone: the agenda and library are shared, never copied, so the
/// HTTP transport can hand a clone to every session.
#[derive(Clone)]
pub struct CfpFinderServer {
    agenda: Arc<Agenda>,
    cfps: Arc<CfpLibrary>,
    sampler: Option<Arc<dyn SamplingBackend>>,
    decider: Arc<dyn ApplicationDecider>,
    temperature: f32,
    max_tokens: u32,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl CfpFinderServer {
    /// Create a server without a matching backend.
    pub fn new(agenda: Arc<Agenda>, cfps: Arc<CfpLibrary>) -> Self {
        Self {
            agenda,
            cfps,
            sampler: None,
            decider: Arc::new(NeverAsk),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Backend for `match_cfps` when the client cannot sample.
    #[must_use]
    pub fn with_sampler(mut self, sampler: Arc<dyn SamplingBackend>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Decider used when the client cannot answer elicitation requests.
    #[must_use]
    pub fn with_decider(mut self, decider: Arc<dyn ApplicationDecider>) -> Self {
        self.decider = decider;
        self
    }

    /// Sampling settings for matching batches.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// The loaded agenda.
    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// The loaded CFP library.
    pub fn cfps(&self) -> &CfpLibrary {
        &self.cfps
    }

    /// Create a success result with text content
    pub fn text_result(text: impl Into<String>) -> CallToolResult {
        CallToolResult::success(vec![Content::text(text.into())])
    }

    /// Create a success result with JSON content
    pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Runs a search for `peer`.
    ///
    /// Matching samples through the client when it advertises sampling and
    /// falls back to the configured backend otherwise; application questions
    /// go through elicitation when the client supports it.
    pub async fn search(
        &self,
        params: SearchConferencesParams,
        peer: Option<&Peer<RoleServer>>,
    ) -> Result<CallToolResult, McpError> {
        let query = params.to_query().map_err(invalid_params)?;
        let results = self.agenda.search(&query, Timestamp::now());
        tracing::info!(filters = %query.describe(), found = results.len(), "search_conferences");

        if params.match_cfps {
            let sampler: Arc<dyn SamplingBackend> = match peer {
                Some(peer) if supports_sampling(peer) => Arc::new(PeerSampler::new(peer.clone())),
                _ => self.sampler.clone().ok_or_else(|| {
                    McpError::invalid_params(
                        "CFP matching is not available: the client does not support sampling \
                         and no model backend is configured",
                        None,
                    )
                })?,
            };
            let decider: Arc<dyn ApplicationDecider> = match peer {
                Some(peer) if supports_elicitation(peer) => Arc::new(PeerElicitor::new(peer.clone())),
                _ => Arc::clone(&self.decider),
            };

            let matcher = CfpMatcher::new(sampler.as_ref(), decider.as_ref())
                .with_min_score(params.min_score.unwrap_or(DEFAULT_MIN_SCORE))
                .with_sampling(self.temperature, self.max_tokens);
            let reports = matcher.match_library(&self.cfps, &results).await;
            return Self::json_result(&reports);
        }

        match params.format {
            OutputFormat::Text => Ok(Self::text_result(render_text(&results, &query))),
            OutputFormat::Json => Self::json_result(&to_views(&results)),
        }
    }

    /// Resources advertised by `resources/list`.
    pub fn resource_list(&self) -> Vec<Resource> {
        let mut resources = Vec::with_capacity(self.cfps.len() + 1);

        let mut tags = RawResource::new(TAGS_URI, "tags");
        tags.description = Some("Tag names and the keywords that trigger them".to_string());
        tags.mime_type = Some("application/json".to_string());
        resources.push(tags.no_annotation());

        for doc in self.cfps.iter() {
            let mut raw = RawResource::new(format!("{CFP_URI_PREFIX}{}", doc.slug), doc.slug.clone());
            raw.description = Some(doc.title.clone());
            raw.mime_type = Some("text/markdown".to_string());
            resources.push(raw.no_annotation());
        }
        resources
    }

    /// Text of the resource at `uri`.
    pub fn resource_text(&self, uri: &str) -> Result<String, McpError> {
        if uri == TAGS_URI {
            let table: Vec<_> = TAG_KEYWORDS
                .iter()
                .map(|(tag, keywords)| serde_json::json!({ "tag": tag, "keywords": keywords }))
                .collect();
            return serde_json::to_string_pretty(&table)
                .map_err(|e| McpError::internal_error(e.to_string(), None));
        }

        uri.strip_prefix(CFP_URI_PREFIX)
            .and_then(|slug| self.cfps.get(slug))
            .map(|doc| doc.content.clone())
            .ok_or_else(|| {
                McpError::resource_not_found(
                    format!("Unknown resource '{uri}'"),
                    Some(serde_json::json!({ "uri": uri })),
                )
            })
    }
}

fn invalid_params(err: CfpError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

// ============================================================================
// Tool Parameter Types
// ============================================================================

/// Output rendering for `search_conferences`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured list.
    #[default]
    Json,
    /// Human-readable block.
    Text,
}

/// Search conferences parameters
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchConferencesParams {
    /// Earliest day the conference must still be running on (YYYY-MM-DD)
    #[serde(default)]
    pub min_date: Option<String>,
    /// Latest day the conference may start on (YYYY-MM-DD)
    #[serde(default)]
    pub max_date: Option<String>,
    /// Country, case-insensitive partial match
    #[serde(default)]
    pub country: Option<String>,
    /// City, case-insensitive partial match
    #[serde(default)]
    pub city: Option<String>,
    /// Comma-separated tags, any of which must match (e.g. "python,ai")
    #[serde(default)]
    pub tags: Option<String>,
    /// Only conferences whose CFP deadline is still ahead
    #[serde(default)]
    pub cfp_open: bool,
    /// Score the results against every CFP write-up and return the matches per CFP
    #[serde(default)]
    pub match_cfps: bool,
    /// Minimum match score, 0-100 (default 50)
    #[serde(default)]
    pub min_score: Option<u8>,
    /// "json" (default) or "text"
    #[serde(default)]
    pub format: OutputFormat,
}

impl SearchConferencesParams {
    /// Builds the core query.
    pub fn to_query(&self) -> Result<ConferenceQuery, CfpError> {
        Ok(ConferenceQuery::from_raw(
            self.min_date.as_deref(),
            self.max_date.as_deref(),
            self.country.as_deref(),
            self.tags.as_deref(),
        )?
        .with_city(self.city.as_deref())
        .with_cfp_open(self.cfp_open))
    }
}

/// One entry of `list_cfps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfpSummary {
    /// Topic slug.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Resource URI.
    pub uri: String,
}

// ============================================================================
// Prompt Argument Types
// ============================================================================

fn default_country() -> String {
    "France".to_string()
}

/// Arguments of `find_conferences_for_open_cfps`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OpenCfpsPromptArgs {
    /// Country to search in (default "France")
    #[serde(default = "default_country")]
    pub country: String,
}

/// Arguments of `conferences_by_month`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MonthPromptArgs {
    /// English month name, e.g. "June"
    pub month: String,
    /// Country to search in (default "France")
    #[serde(default = "default_country")]
    pub country: String,
    /// Four-digit year (default: current year)
    #[serde(default)]
    pub year: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
#[allow(missing_docs)]
impl CfpFinderServer {
    /// Search the agenda
    #[tool(
        description = "Search developer conferences by date window (YYYY-MM-DD), country, city, \
                       comma-separated tags and open CFP. Results are sorted by start date. \
                       With match_cfps=true, returns for each CFP write-up the conferences that \
                       match it (match_score >= min_score), keyed by CFP slug."
    )]
    pub async fn search_conferences(
        &self,
        peer: Peer<RoleServer>,
        Parameters(params): Parameters<SearchConferencesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.search(params, Some(&peer)).await
    }

    /// List CFP write-ups
    #[tool(description = "List the available CFP write-ups (talk proposals) with their slug, title and resource URI.")]
    pub async fn list_cfps(&self) -> Result<CallToolResult, McpError> {
        let summaries: Vec<CfpSummary> = self
            .cfps
            .iter()
            .map(|doc| CfpSummary {
                slug: doc.slug.clone(),
                title: doc.title.clone(),
                uri: format!("{CFP_URI_PREFIX}{}", doc.slug),
            })
            .collect();
        Self::json_result(&summaries)
    }
}

// ============================================================================
// Prompt Implementations
// ============================================================================

#[prompt_router]
#[allow(missing_docs)]
impl CfpFinderServer {
    /// Open-CFP matching workflow
    #[prompt(
        name = "find_conferences_for_open_cfps",
        description = "Find conferences in a country with an open CFP and match them against the CFP write-ups"
    )]
    pub async fn find_conferences_for_open_cfps(
        &self,
        Parameters(args): Parameters<OpenCfpsPromptArgs>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(GetPromptResult {
            description: Some(format!("Conferences with an open CFP in {}", args.country)),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                prompts::find_conferences_for_open_cfps(&args.country),
            )],
        })
    }

    /// Monthly overview
    #[prompt(
        name = "conferences_by_month",
        description = "Overview of the conferences held in a country during a given month"
    )]
    pub async fn conferences_by_month(
        &self,
        Parameters(args): Parameters<MonthPromptArgs>,
    ) -> Result<GetPromptResult, McpError> {
        let month = parse_month(&args.month).map_err(invalid_params)?;
        let year = match args.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                McpError::invalid_params(format!("Invalid year '{raw}'"), None)
            })?,
            None => chrono::Utc::now().year(),
        };

        Ok(GetPromptResult {
            description: Some(format!("Conferences in {} during {} {year}", args.country, month.name())),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                prompts::conferences_by_month(month.name(), year, &args.country),
            )],
        })
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for CfpFinderServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "CFP Finder - {} developer conferences and {} CFP write-ups. \
             Use search_conferences to filter by date, location, tags or open CFP, \
             and set match_cfps=true to score conferences against the CFPs \
             (list them with list_cfps or read cfp://{{slug}} resources).",
            self.agenda.len(),
            self.cfps.len()
        );

        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                title: Some("CFP Finder".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resource_list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.resource_text(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
