//! Call-for-papers write-ups, keyed by topic slug.

use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CfpError, CfpResult};

/// File extensions picked up by [`CfpLibrary::load_dir`].
const CFP_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// One talk proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfpDocument {
    /// Short topic key, the file stem.
    pub slug: String,
    /// First `# ` heading, or the slug.
    pub title: String,
    /// Full text.
    pub content: String,
}

impl CfpDocument {
    /// Builds a document, taking the title from the first level-one heading.
    pub fn new(slug: impl Into<String>, content: impl Into<String>) -> Self {
        let slug = slug.into();
        let content = content.into();
        let title = content
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| slug.clone(), ToString::to_string);
        Self {
            slug,
            title,
            content,
        }
    }
}

/// All known CFP write-ups, ordered by slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfpLibrary {
    documents: BTreeMap<String, CfpDocument>,
}

impl CfpLibrary {
    /// An empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every markdown/text file in `dir`.
    ///
    /// A missing directory yields an empty library.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::Io` when the directory or a file cannot be read.
    pub fn load_dir(dir: impl AsRef<Path>) -> CfpResult<Self> {
        let dir = dir.as_ref();
        let mut library = Self::new();
        if !dir.is_dir() {
            warn!("CFP directory {} not found, no CFPs loaded", dir.display());
            return Ok(library);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| CfpError::io(dir, &e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CfpError::io(dir, &e))?;
            let path = entry.path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CFP_EXTENSIONS.contains(&ext));
            if !path.is_file() || !wanted {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|e| CfpError::io(&path, &e))?;
            library.insert(CfpDocument::new(slug, content));
        }

        info!("Loaded {} CFPs from {}", library.len(), dir.display());
        Ok(library)
    }

    /// Adds or replaces a document.
    pub fn insert(&mut self, document: CfpDocument) {
        self.documents.insert(document.slug.clone(), document);
    }

    /// Looks up a document by slug; `None` is the not-found sentinel.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&CfpDocument> {
        self.documents.get(slug)
    }

    /// Documents in slug order.
    pub fn iter(&self) -> impl Iterator<Item = &CfpDocument> {
        self.documents.values()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<CfpDocument> for CfpLibrary {
    fn from_iter<I: IntoIterator<Item = CfpDocument>>(iter: I) -> Self {
        let mut library = Self::new();
        for doc in iter {
            library.insert(doc);
        }
        library
    }
}
