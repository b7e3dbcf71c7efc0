//! Presentation of query results.
//!
//! Formatting never changes which conferences are returned or their order;
//! it only renders instants as `YYYY-MM-DD` strings.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::query::ConferenceQuery;
use crate::types::{Conference, DateSpan};

/// Rendered date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateView {
    /// First day, `YYYY-MM-DD`.
    pub beginning: String,
    /// Last day, `YYYY-MM-DD`.
    pub end: String,
}

/// Rendered CFP window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfpView {
    /// Submission link.
    pub link: String,
    /// Deadline as `YYYY-MM-DD`, `null` when unknown.
    pub until_date: Option<String>,
}

/// Structured, display-ready conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceView {
    /// Display name.
    pub name: String,
    /// Date range, if dated.
    pub date: Option<DateView>,
    /// `"2026-05-15"` or `"2026-05-15 to 2026-05-17"`.
    pub date_formatted: Option<String>,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
    /// Raw location text.
    pub location: String,
    /// Conference website.
    pub hyperlink: String,
    /// Derived tags.
    pub tags: Vec<String>,
    /// CFP window, when advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfp: Option<CfpView>,
}

impl From<&Conference> for ConferenceView {
    fn from(conf: &Conference) -> Self {
        Self {
            name: conf.name.clone(),
            date: conf.date.map(|span| DateView {
                beginning: span.beginning.format_ymd(),
                end: span.end.format_ymd(),
            }),
            date_formatted: conf.date.map(|span| format_span(&span)),
            city: conf.city.clone(),
            country: conf.country.clone(),
            location: conf.location.clone(),
            hyperlink: conf.hyperlink.clone(),
            tags: conf.tags.clone(),
            cfp: conf.cfp.as_ref().map(|cfp| CfpView {
                link: cfp.link.clone(),
                until_date: cfp.until_date.map(|d| d.format_ymd()),
            }),
        }
    }
}

/// `"YYYY-MM-DD"`, or `"YYYY-MM-DD to YYYY-MM-DD"` when the days differ.
#[must_use]
pub fn format_span(span: &DateSpan) -> String {
    if span.is_single_day() {
        span.beginning.format_ymd()
    } else {
        format!("{} to {}", span.beginning.format_ymd(), span.end.format_ymd())
    }
}

/// Renders results as a structured list.
#[must_use]
pub fn to_views(results: &[&Conference]) -> Vec<ConferenceView> {
    results.iter().map(|c| ConferenceView::from(*c)).collect()
}

/// Renders results as a human-readable block.
///
/// ```text
/// Found 2 conferences (in France):
///
/// • PyCon France 2026 - 2026-05-15 to 2026-05-17 - Paris (France)
///   https://pycon.fr
/// ```
#[must_use]
pub fn render_text(results: &[&Conference], query: &ConferenceQuery) -> String {
    let mut out = format!(
        "Found {} conferences ({}):\n\n",
        results.len(),
        query.describe()
    );
    for conf in results {
        let date = conf
            .date
            .map_or_else(|| "N/A".to_string(), |span| format_span(&span));
        let _ = writeln!(out, "• {} - {} - {}", conf.name, date, conf.location);
        let _ = writeln!(out, "  {}", conf.hyperlink);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CfpWindow, Timestamp};

    fn pycon() -> Conference {
        Conference::new("PyCon France 2026", "https://pycon.fr")
            .with_location("Paris (France)", "Paris", "France")
            .with_tags(["python"])
            .with_date(DateSpan {
                beginning: Timestamp::from_ymd(2026, 5, 15).unwrap(),
                end: Timestamp::from_ymd(2026, 5, 17).unwrap(),
            })
    }

    #[test]
    fn test_view_formats_dates() {
        let view = ConferenceView::from(&pycon());
        let date = view.date.unwrap();
        assert_eq!(date.beginning, "2026-05-15");
        assert_eq!(date.end, "2026-05-17");
        assert_eq!(view.date_formatted.as_deref(), Some("2026-05-15 to 2026-05-17"));
    }

    #[test]
    fn test_single_day_span() {
        let day = Timestamp::from_ymd(2026, 6, 5).unwrap();
        assert_eq!(format_span(&DateSpan::single(day)), "2026-06-05");
    }

    #[test]
    fn test_view_json_shape() {
        let conf = pycon().with_cfp(CfpWindow {
            link: "https://cfp.pycon.fr".into(),
            until_date: Some(Timestamp::from_ymd(2026, 2, 1).unwrap()),
        });
        let json = serde_json::to_value(ConferenceView::from(&conf)).unwrap();
        assert_eq!(json["dateFormatted"], "2026-05-15 to 2026-05-17");
        assert_eq!(json["cfp"]["untilDate"], "2026-02-01");
        assert_eq!(json["tags"][0], "python");
    }

    #[test]
    fn test_render_text() {
        let conf = pycon();
        let undated = Conference::new("Someday Conf", "https://someday.example");
        let text = render_text(&[&conf, &undated], &ConferenceQuery::new());
        assert!(text.starts_with("Found 2 conferences (all):"));
        assert!(text.contains("• PyCon France 2026 - 2026-05-15 to 2026-05-17 - Paris (France)"));
        assert!(text.contains("  https://pycon.fr"));
        assert!(text.contains("• Someday Conf - N/A - Unknown"));
    }
}
