//! # CFP Finder Core
//!
//! Conference agenda parsing, querying and CFP matching.
//!
//! This crate holds everything that does not need a network connection:
//!
//! - **Parser**: turns the community agenda markdown into [`Conference`] records
//! - **Query**: date, location, tag and open-CFP filters, ordered by start date
//! - **Format**: structured views and the human-readable text block
//! - **CFP library**: talk proposals loaded from a directory of markdown files
//! - **Matching**: batch prompts, model-output decoding and score filtering,
//!   behind the [`SamplingBackend`] trait
//!
//! ## Example
//!
//! ```rust
//! use cfpfinder_core::prelude::*;
//!
//! let agenda = Agenda::from_markdown(
//!     "## 2026\n### June\n* 5-6: [Rust Paris](https://rust.paris) - Paris (France)\n",
//! );
//! let query = ConferenceQuery::from_raw(None, None, Some("france"), None).unwrap();
//! let found = agenda.search(&query, Timestamp::now());
//! assert_eq!(found[0].city, "Paris");
//! ```
//!
//! [`Conference`]: types::Conference
//! [`SamplingBackend`]: matching::SamplingBackend

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod agenda;
pub mod cfp;
pub mod error;
pub mod format;
pub mod matching;
pub mod parser;
pub mod prompts;
pub mod query;
pub mod tags;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::agenda::Agenda;
    pub use crate::cfp::{CfpDocument, CfpLibrary};
    pub use crate::error::{CfpError, CfpResult};
    pub use crate::format::{render_text, to_views, ConferenceView};
    pub use crate::matching::{
        ApplicationDecider, ApplicationStatus, CfpMatchReport, CfpMatcher, ConferenceMatch,
        NeverAsk, SamplingBackend, SamplingRequest,
    };
    pub use crate::query::ConferenceQuery;
    pub use crate::types::{CfpWindow, Conference, DateSpan, Timestamp};
}
