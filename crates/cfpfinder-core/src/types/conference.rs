//! Conference records produced by the agenda parser.

use serde::{Deserialize, Serialize};

use super::Timestamp;
use crate::parser::UNKNOWN_LOCATION;
use crate::tags::extract_tags;

/// Inclusive date range of a conference.
///
/// Single-day events have `beginning == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day, midnight.
    pub beginning: Timestamp,
    /// Last day, midnight.
    pub end: Timestamp,
}

impl DateSpan {
    /// A span covering a single day.
    #[must_use]
    pub fn single(day: Timestamp) -> Self {
        Self {
            beginning: day,
            end: day,
        }
    }

    /// Whether the span covers exactly one day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.beginning == self.end
    }

    /// Interval overlap against an optionally bounded window.
    ///
    /// An absent bound is unbounded on that side.
    #[must_use]
    pub fn overlaps(&self, min: Option<Timestamp>, max: Option<Timestamp>) -> bool {
        min.map_or(true, |min| self.end >= min) && max.map_or(true, |max| self.beginning <= max)
    }
}

/// Call-for-papers window attached to a conference.
///
/// `until_date` is `None` when the badge markup was present but its date
/// could not be decoded; the link is still kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfpWindow {
    /// Submission link.
    pub link: String,
    /// Submission deadline, midnight of the last day.
    pub until_date: Option<Timestamp>,
}

impl CfpWindow {
    /// Whether submissions are still accepted at `now`.
    ///
    /// A window without a trustworthy deadline is never considered open.
    #[must_use]
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        self.until_date.is_some_and(|deadline| deadline > now)
    }
}

/// A single conference from the agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    /// Display name.
    pub name: String,
    /// Date range; always present for parsed entries.
    pub date: Option<DateSpan>,
    /// City, best-effort split from `location`.
    pub city: String,
    /// Country, best-effort split from `location`.
    pub country: String,
    /// Raw location text as found in the source.
    pub location: String,
    /// Conference website.
    pub hyperlink: String,
    /// Topical tags derived from the name.
    pub tags: Vec<String>,
    /// Call-for-papers window, when advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfp: Option<CfpWindow>,
}

impl Conference {
    /// Creates a conference with tags derived from `name`, no date and an unknown location.
    pub fn new(name: impl Into<String>, hyperlink: impl Into<String>) -> Self {
        let name = name.into();
        let tags = extract_tags(&name);
        Self {
            name,
            date: None,
            city: String::new(),
            country: String::new(),
            location: UNKNOWN_LOCATION.to_string(),
            hyperlink: hyperlink.into(),
            tags,
            cfp: None,
        }
    }

    /// Sets the date range.
    #[must_use]
    pub fn with_date(mut self, span: DateSpan) -> Self {
        self.date = Some(span);
        self
    }

    /// Sets the location fields.
    #[must_use]
    pub fn with_location(
        mut self,
        location: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.location = location.into();
        self.city = city.into();
        self.country = country.into();
        self
    }

    /// Replaces the derived tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a CFP window.
    #[must_use]
    pub fn with_cfp(mut self, cfp: CfpWindow) -> Self {
        self.cfp = Some(cfp);
        self
    }

    /// Start instant, if dated.
    #[must_use]
    pub fn beginning(&self) -> Option<Timestamp> {
        self.date.map(|d| d.beginning)
    }

    /// Whether the conference has a CFP accepting submissions at `now`.
    #[must_use]
    pub fn has_open_cfp(&self, now: Timestamp) -> bool {
        self.cfp.as_ref().is_some_and(|cfp| cfp.is_open_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Timestamp {
        Timestamp::from_ymd(2026, 3, d).unwrap()
    }

    #[test]
    fn test_new_has_unknown_location() {
        let conf = Conference::new("Devoxx France", "https://devoxx.fr");
        assert_eq!(conf.location, UNKNOWN_LOCATION);
        assert!(conf.city.is_empty());
        assert!(conf.date.is_none());
    }

    #[test]
    fn test_overlap_is_not_containment() {
        let event = DateSpan {
            beginning: day(15),
            end: day(17),
        };
        assert!(event.overlaps(Some(day(16)), Some(day(20))));
        assert!(!event.overlaps(Some(day(18)), Some(day(31))));
        assert!(event.overlaps(None, Some(day(15))));
        assert!(event.overlaps(None, None));
    }

    #[test]
    fn test_cfp_without_deadline_is_never_open() {
        let cfp = CfpWindow {
            link: "https://cfp.example".into(),
            until_date: None,
        };
        assert!(!cfp.is_open_at(Timestamp::from_secs(0)));
    }

    #[test]
    fn test_cfp_deadline_is_strictly_future() {
        let cfp = CfpWindow {
            link: "https://cfp.example".into(),
            until_date: Some(day(10)),
        };
        assert!(cfp.is_open_at(day(9)));
        assert!(!cfp.is_open_at(day(10)));
    }

    #[test]
    fn test_new_derives_tags() {
        let conf = Conference::new("Python Web Summit", "https://pws.example");
        assert_eq!(conf.tags, vec!["web", "python"]);
        assert_eq!(conf.location, "Unknown");
    }

    #[test]
    fn test_cfp_serializes_camel_case() {
        let conf = Conference::new("X", "https://x.example").with_cfp(CfpWindow {
            link: "https://cfp.example".into(),
            until_date: None,
        });
        let json = serde_json::to_value(&conf).unwrap();
        assert!(json["cfp"]["untilDate"].is_null());
    }
}
