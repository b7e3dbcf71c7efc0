//! # CFP Finder MCP Server
//!
//! Model Context Protocol (MCP) server exposing the developer conference
//! agenda and a library of CFP write-ups.
//!
//! ## Features
//!
//! - **Tools**: `search_conferences` (filters, text/JSON output, CFP matching)
//!   and `list_cfps`
//! - **Resources**: `cfp://{slug}` for every write-up, `conferences://tags`
//! - **Prompts**: `find_conferences_for_open_cfps`, `conferences_by_month`
//! - **Client callbacks**: CFP matching samples through the client and asks
//!   the user about each match with elicitation, when the client supports it
//! - **Multiple Transports**: stdio (local) and streamable HTTP (remote)
//!
//! ## Quick Start
//!
//! ```bash
//! # stdio transport
//! cfpfinder-mcp-server --agenda data/developers-conferences-agenda/README.md
//!
//! # HTTP transport, MCP endpoint at /mcp
//! cfpfinder-mcp-server --http --port 8000 --cfp-dir cfps
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod peer;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::CfpFinderServer;

/// Server name for MCP protocol
pub const SERVER_NAME: &str = "cfp-server";

/// Server version (same as crate version)
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
