//! Prompt construction for one matching batch.

use std::fmt::Write as _;

use crate::cfp::CfpDocument;
use crate::format::format_span;
use crate::types::Conference;

/// Instructions shared by every batch.
pub const SYSTEM_PROMPT: &str = "You are an assistant that matches talk proposals (CFPs) \
with developer conferences. Score how well each conference fits the proposal from 0 to 100, \
based on its topics, its audience and its tags. Reply ONLY with a JSON array of objects \
with the keys \"name\" (exactly as listed), \"score\" (integer 0-100) and \"reasoning\" \
(one sentence). Do not add any other text.";

/// User prompt carrying the proposal and the candidate listing.
#[must_use]
pub fn build_user_prompt(cfp: &CfpDocument, candidates: &[&Conference]) -> String {
    let mut out = format!(
        "## Talk proposal: {}\n\n{}\n\n## Candidate conferences ({})\n\n",
        cfp.title,
        cfp.content.trim(),
        candidates.len()
    );
    for (i, conf) in candidates.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, candidate_line(conf));
    }
    out.push_str("\nReturn the JSON array now.");
    out
}

/// `name | dates | location | tags: a, b | CFP until: date`
fn candidate_line(conf: &Conference) -> String {
    let dates = conf
        .date
        .map_or_else(|| "dates unknown".to_string(), |span| format_span(&span));
    let tags = if conf.tags.is_empty() {
        "none".to_string()
    } else {
        conf.tags.join(", ")
    };
    let deadline = conf
        .cfp
        .as_ref()
        .and_then(|cfp| cfp.until_date)
        .map_or_else(|| "unknown".to_string(), |d| d.format_ymd());
    format!(
        "{} | {} | {} | tags: {} | CFP until: {}",
        conf.name, dates, conf.location, tags, deadline
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CfpWindow, DateSpan, Timestamp};

    #[test]
    fn test_user_prompt_lists_candidates() {
        let cfp = CfpDocument::new("rust", "# Fearless Rust\nOwnership for beginners.");
        let devoxx = Conference::new("Devoxx France", "https://devoxx.fr")
            .with_location("Paris (France)", "Paris", "France")
            .with_tags(["java"])
            .with_date(DateSpan::single(Timestamp::from_ymd(2026, 4, 22).unwrap()))
            .with_cfp(CfpWindow {
                link: "https://cfp.devoxx.fr".into(),
                until_date: Some(Timestamp::from_ymd(2026, 1, 10).unwrap()),
            });
        let unknown = Conference::new("Mystery Meetup", "https://mystery.example");

        let prompt = build_user_prompt(&cfp, &[&devoxx, &unknown]);
        assert!(prompt.contains("## Talk proposal: Fearless Rust"));
        assert!(prompt.contains("Ownership for beginners."));
        assert!(prompt.contains("Candidate conferences (2)"));
        assert!(prompt.contains(
            "1. Devoxx France | 2026-04-22 | Paris (France) | tags: java | CFP until: 2026-01-10"
        ));
        assert!(prompt.contains("2. Mystery Meetup | dates unknown | Unknown | tags: none | CFP until: unknown"));
    }

    #[test]
    fn test_system_prompt_names_keys() {
        for key in ["\"name\"", "\"score\"", "\"reasoning\""] {
            assert!(SYSTEM_PROMPT.contains(key));
        }
    }
}
