//! Tool result content as seen by the orchestrator.

use rmcp::model::{Content, RawContent, ResourceContents};

/// Content kinds the orchestrator distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Plain text, usually JSON.
    Text(String),
    /// Binary image, never forwarded.
    Image {
        /// MIME type.
        mime_type: String,
    },
    /// Embedded resource, with its text when it has one.
    Resource {
        /// Resource URI.
        uri: String,
        /// Text body, `None` for blobs.
        text: Option<String>,
    },
    /// Anything else.
    Other,
}

impl From<&RawContent> for ContentKind {
    fn from(raw: &RawContent) -> Self {
        match raw {
            RawContent::Text(text) => Self::Text(text.text.clone()),
            RawContent::Image(image) => Self::Image {
                mime_type: image.mime_type.clone(),
            },
            RawContent::Resource(embedded) => match &embedded.resource {
                ResourceContents::TextResourceContents { uri, text, .. } => Self::Resource {
                    uri: uri.clone(),
                    text: Some(text.clone()),
                },
                ResourceContents::BlobResourceContents { uri, .. } => Self::Resource {
                    uri: uri.clone(),
                    text: None,
                },
            },
            _ => Self::Other,
        }
    }
}

impl ContentKind {
    /// Text carried by this item, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Resource { text, .. } => text.as_deref(),
            Self::Image { .. } | Self::Other => None,
        }
    }
}

/// Concatenates the text of every item; non-text items are logged and skipped.
pub fn collect_text(content: &[Content]) -> String {
    let mut out = String::new();
    for item in content {
        let kind = ContentKind::from(&item.raw);
        match kind.text() {
            Some(text) => out.push_str(text),
            None => tracing::debug!(?kind, "Skipping non-text tool content"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_resource_are_collected() {
        let content = vec![
            Content::text("[1,"),
            Content::text("2]"),
            Content::image("aGVsbG8=", "image/png"),
        ];
        assert_eq!(collect_text(&content), "[1,2]");
    }

    #[test]
    fn test_kinds() {
        let text = Content::text("hello");
        assert_eq!(ContentKind::from(&text.raw), ContentKind::Text("hello".into()));

        let image = Content::image("aGVsbG8=", "image/png");
        let kind = ContentKind::from(&image.raw);
        assert_eq!(
            kind,
            ContentKind::Image {
                mime_type: "image/png".into()
            }
        );
        assert!(kind.text().is_none());
    }
}
