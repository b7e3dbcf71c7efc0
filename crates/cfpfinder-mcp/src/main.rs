//! CFP Finder MCP Server - conference search and CFP matching via Model Context Protocol
//!
//! # Usage
//!
//! ## stdio transport (local use)
//! ```bash
//! cfpfinder-mcp-server
//! cfpfinder-mcp-server --config cfpfinder.toml
//! ```
//!
//! ## HTTP transport (for the orchestrator client)
//! ```bash
//! cfpfinder-mcp-server --http --port 8000
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cfpfinder_core::agenda::Agenda;
use cfpfinder_core::cfp::CfpLibrary;
use cfpfinder_llm::{ChatClient, LlmSampler};
use cfpfinder_mcp::{CfpFinderServer, ServerConfig};

/// CFP Finder MCP Server
#[derive(Parser, Debug)]
#[command(name = "cfpfinder-mcp-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Agenda markdown document (overrides the config)
    #[arg(long)]
    agenda: Option<PathBuf>,

    /// Directory of CFP write-ups (overrides the config)
    #[arg(long)]
    cfp_dir: Option<PathBuf>,

    /// Use HTTP transport instead of stdio
    #[arg(long)]
    http: bool,

    /// HTTP host to bind to (only used with --http)
    #[arg(long)]
    host: Option<String>,

    /// HTTP port (only used with --http)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn resolve(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(agenda) = &self.agenda {
            config.agenda_path.clone_from(agenda);
        }
        if let Some(dir) = &self.cfp_dir {
            config.cfp_dir.clone_from(dir);
        }
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("cfpfinder_mcp=debug,cfpfinder_core=debug,cfpfinder_llm=debug,rmcp=debug")
        })
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("cfpfinder_mcp=info,cfpfinder_core=info,rmcp=warn"))
    };

    // Only log to stderr for stdio transport to avoid corrupting the protocol
    if args.http {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = args.resolve()?;
    let server = build_server(&config)?;

    if args.http {
        run_http_server(server, &config.host, config.port).await
    } else {
        run_stdio_server(server).await
    }
}

/// Load the agenda and CFPs, and wire the fallback matching backend.
///
/// Clients that advertise sampling answer matching batches themselves; the
/// configured model only serves clients that cannot.
fn build_server(config: &ServerConfig) -> anyhow::Result<CfpFinderServer> {
    tracing::info!("Starting CFP Finder MCP Server");

    let agenda = Agenda::load(&config.agenda_path)?;
    let cfps = CfpLibrary::load_dir(&config.cfp_dir)?;
    let client = ChatClient::from_config(&config.llm).context("building the model client")?;
    tracing::info!(
        conferences = agenda.len(),
        cfps = cfps.len(),
        model = client.model(),
        "Data loaded"
    );

    Ok(CfpFinderServer::new(Arc::new(agenda), Arc::new(cfps))
        .with_sampler(Arc::new(LlmSampler::new(client)))
        .with_sampling(config.llm.temperature, config.llm.max_tokens))
}

/// Run the server with stdio transport
#[cfg(feature = "stdio")]
async fn run_stdio_server(server: CfpFinderServer) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    tracing::info!("Using stdio transport");

    let service = server.serve(stdio()).await?;

    tracing::info!("CFP Finder MCP Server ready");
    tracing::info!("Available tools: search_conferences, list_cfps");

    service.waiting().await?;

    Ok(())
}

/// Fallback when stdio feature is not enabled
#[cfg(not(feature = "stdio"))]
async fn run_stdio_server(_server: CfpFinderServer) -> anyhow::Result<()> {
    anyhow::bail!("stdio transport not available. Rebuild with: cargo build --features stdio")
}

/// Run the server with HTTP transport
#[cfg(feature = "http")]
async fn run_http_server(server: CfpFinderServer, host: &str, port: u16) -> anyhow::Result<()> {
    use axum::Router;
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };
    use tower_http::cors::{Any, CorsLayer};

    tracing::info!("Using HTTP transport on {}:{}", host, port);

    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    // Configure CORS for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", axum::routing::get(health_check))
        .layer(cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!("CFP Finder MCP Server listening on http://{}/mcp", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for CTRL+C: {err}");
            }
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

/// Health check endpoint for HTTP transport
#[cfg(feature = "http")]
async fn health_check() -> &'static str {
    "OK"
}

/// Fallback when HTTP feature is not enabled
#[cfg(not(feature = "http"))]
async fn run_http_server(_server: CfpFinderServer, _host: &str, _port: u16) -> anyhow::Result<()> {
    anyhow::bail!("HTTP transport not available. Rebuild with: cargo build --features http")
}
