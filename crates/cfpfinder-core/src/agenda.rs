//! The parsed, immutable conference list.

use std::path::Path;

use log::info;

use crate::error::{CfpError, CfpResult};
use crate::parser::parse_document;
use crate::query::ConferenceQuery;
use crate::types::{Conference, Timestamp};

/// Conferences parsed once from an agenda document.
///
/// Construct it at startup and share it by reference (or `Arc`); it is never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    conferences: Vec<Conference>,
}

impl Agenda {
    /// Wraps an already-built list.
    #[must_use]
    pub fn new(conferences: Vec<Conference>) -> Self {
        Self { conferences }
    }

    /// Parses agenda markdown held in memory.
    #[must_use]
    pub fn from_markdown(text: &str) -> Self {
        Self::new(parse_document(text))
    }

    /// Reads and parses the agenda document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::DocumentNotFound` when the file does not exist and
    /// `CfpError::Io` when it cannot be read. Malformed content never fails.
    pub fn load(path: impl AsRef<Path>) -> CfpResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CfpError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| CfpError::io(path, &e))?;
        let agenda = Self::from_markdown(&text);
        info!(
            "Loaded {} conferences from {}",
            agenda.len(),
            path.display()
        );
        Ok(agenda)
    }

    /// All conferences in document order.
    #[must_use]
    pub fn conferences(&self) -> &[Conference] {
        &self.conferences
    }

    /// Number of conferences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conferences.len()
    }

    /// Whether the agenda is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conferences.is_empty()
    }

    /// Runs `query` at instant `now`.
    #[must_use]
    pub fn search(&self, query: &ConferenceQuery, now: Timestamp) -> Vec<&Conference> {
        query.apply(&self.conferences, now)
    }
}
