//! Filtering and ordering over the conference list.
//!
//! All filters combine with AND. Results are always ordered by `beginning`
//! ascending, undated conferences last.

use crate::error::CfpResult;
use crate::types::{Conference, Timestamp};

/// Search criteria for [`ConferenceQuery::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConferenceQuery {
    /// Earliest day the conference must still be running on.
    pub min_date: Option<Timestamp>,
    /// Latest day the conference may start on.
    pub max_date: Option<Timestamp>,
    /// Case-insensitive substring of the country.
    pub country: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    /// Any-match tag set; empty means no tag filter.
    pub tags: Vec<String>,
    /// Only conferences whose CFP deadline is still ahead.
    pub cfp_open: bool,
}

impl ConferenceQuery {
    /// An empty query that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from raw caller input.
    ///
    /// Dates must be `YYYY-MM-DD`; `tags` is a comma-separated list. Blank
    /// strings are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::InvalidDate` when a date cannot be parsed.
    pub fn from_raw(
        min_date: Option<&str>,
        max_date: Option<&str>,
        country: Option<&str>,
        tags: Option<&str>,
    ) -> CfpResult<Self> {
        Ok(Self {
            min_date: parse_filter_date(min_date)?,
            max_date: parse_filter_date(max_date)?,
            country: non_blank(country),
            city: None,
            tags: tags.map(parse_tag_list).unwrap_or_default(),
            cfp_open: false,
        })
    }

    /// Sets the city filter.
    #[must_use]
    pub fn with_city(mut self, city: Option<&str>) -> Self {
        self.city = non_blank(city);
        self
    }

    /// Restricts results to open CFPs.
    #[must_use]
    pub fn with_cfp_open(mut self, cfp_open: bool) -> Self {
        self.cfp_open = cfp_open;
        self
    }

    /// Whether any date bound was supplied.
    #[must_use]
    pub fn has_date_filter(&self) -> bool {
        self.min_date.is_some() || self.max_date.is_some()
    }

    /// Whether `conference` satisfies every criterion at instant `now`.
    #[must_use]
    pub fn matches(&self, conference: &Conference, now: Timestamp) -> bool {
        if let Some(country) = &self.country {
            if !contains_ignore_case(&conference.country, country) {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if !contains_ignore_case(&conference.city, city) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let hit = conference
                .tags
                .iter()
                .any(|tag| self.tags.iter().any(|wanted| wanted.eq_ignore_ascii_case(tag)));
            if !hit {
                return false;
            }
        }

        if self.has_date_filter() {
            let Some(span) = conference.date else {
                return false;
            };
            if !span.overlaps(self.min_date, self.max_date) {
                return false;
            }
        }

        if self.cfp_open && !conference.has_open_cfp(now) {
            return false;
        }

        true
    }

    /// Filters and orders `conferences`.
    #[must_use]
    pub fn apply<'a>(&self, conferences: &'a [Conference], now: Timestamp) -> Vec<&'a Conference> {
        let mut results: Vec<&Conference> = conferences
            .iter()
            .filter(|c| self.matches(c, now))
            .collect();
        sort_by_beginning(&mut results);
        results
    }

    /// Short human description of the active filters, `"all"` when none.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(min) = self.min_date {
            parts.push(format!("from {min}"));
        }
        if let Some(max) = self.max_date {
            parts.push(format!("until {max}"));
        }
        if let Some(country) = &self.country {
            parts.push(format!("in {country}"));
        }
        if let Some(city) = &self.city {
            parts.push(format!("near {city}"));
        }
        if !self.tags.is_empty() {
            parts.push(format!("tagged {}", self.tags.join(",")));
        }
        if self.cfp_open {
            parts.push("with open CFP".to_string());
        }

        if parts.is_empty() {
            "all".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Stable sort by `beginning`, undated entries last.
pub fn sort_by_beginning(conferences: &mut [&Conference]) {
    conferences.sort_by_key(|c| c.beginning().map_or(i64::MAX, Timestamp::as_secs));
}

/// Splits `"javascript, DevOps,"` into `["javascript", "devops"]`.
#[must_use]
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_filter_date(raw: Option<&str>) -> CfpResult<Option<Timestamp>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Timestamp::parse_ymd)
        .transpose()
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
