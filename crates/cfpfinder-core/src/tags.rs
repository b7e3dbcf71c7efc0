//! Topical tags derived from conference names.
//!
//! Tagging is plain case-insensitive substring matching against a fixed,
//! ordered keyword table. The output follows table order, never match order,
//! so deriving tags twice from the same name always yields the same sequence.

/// Ordered `(tag, keywords)` table.
pub const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("ai", &["ai", "artificial intelligence", "machine learning", "ml"]),
    ("cloud", &["cloud", "aws", "azure", "gcp"]),
    ("devops", &["devops", "kubernetes", "docker"]),
    ("security", &["security", "infosec", "cybersec"]),
    ("web", &["web", "frontend", "backend", "fullstack"]),
    ("data", &["data", "database", "analytics", "bigdata"]),
    ("mobile", &["mobile", "ios", "android"]),
    (
        "javascript",
        &["javascript", "js", "node", "react", "vue", "angular"],
    ),
    ("python", &["python", "django", "flask"]),
    ("java", &["java", "spring"]),
    (".net", &[".net", "dotnet", "csharp", "c#"]),
    ("agile", &["agile", "scrum"]),
    ("development", &["voxx", "craft", "gdg", "dev", "developers"]),
];

/// Derives tags from a conference name.
///
/// # Example
///
/// ```rust
/// use cfpfinder_core::tags::extract_tags;
///
/// assert_eq!(extract_tags("JavaScript AI Summit"), vec!["ai", "javascript", "java"]);
/// assert!(extract_tags("Generic Tech Conference").is_empty());
/// ```
#[must_use]
pub fn extract_tags(name: &str) -> Vec<String> {
    let lowered = name.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}
