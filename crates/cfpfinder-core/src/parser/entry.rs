//! Entry line parser.
//!
//! An entry looks like:
//!
//! ```text
//! * 31-01/02: [FOSDEM 2026](https://fosdem.org/2026/) - Brussels (Belgium) <a href="https://cfp"><img alt="CFP" src="https://img.shields.io/static/v1?label=CFP&message=until%2015-November-2025&color=green"></a>
//! ```
//!
//! The date token and the `[name](url)` token are mandatory; location and
//! the CFP badge are optional.

use chrono::{Month, NaiveDate};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::resolve_date_range;
use crate::tags::extract_tags;
use crate::types::{CfpWindow, Conference, Timestamp};

static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d\-/]+):\s+").expect("date token pattern is valid"));
static NAME_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)").expect("name/link pattern is valid")
});
static LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s+([^<\n]+)").expect("location pattern is valid"));
static CFP_BADGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="([^"]+)"><img[^>]*message=until%20([^"&]+)"#)
        .expect("cfp badge pattern is valid")
});

/// Location text used when an entry has no location token.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// City and country split out of a raw location string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Place {
    /// City, possibly empty.
    pub city: String,
    /// Country, possibly empty.
    pub country: String,
}

/// Parses a bullet line belonging to `year`/`month`.
///
/// Returns `None` when the line is not an entry: the date token or the
/// name/link token is missing, or the date token is malformed.
pub fn parse_entry_line(line: &str, year: i32, month: Month) -> Option<Conference> {
    let rest = line.trim_start().trim_start_matches('*').trim();

    let date_caps = DATE_TOKEN.captures(rest)?;
    let date_token = date_caps.get(1)?.as_str();
    let rest = &rest[date_caps.get(0)?.end()..];

    let link_caps = NAME_LINK.captures(rest)?;
    let name = link_caps.get(1)?.as_str();
    let hyperlink = link_caps.get(2)?.as_str();
    let rest = rest[link_caps.get(0)?.end()..].trim();

    let (location, place, rest) = match LOCATION.captures(rest) {
        Some(caps) => {
            let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
            let end = caps.get(0).map_or(0, |m| m.end());
            (raw.to_string(), split_location(raw), &rest[end..])
        }
        None => (UNKNOWN_LOCATION.to_string(), Place::default(), rest),
    };

    let cfp = parse_cfp_badge(rest);

    let span = match resolve_date_range(date_token, year, month) {
        Ok(span) => span,
        Err(err) => {
            debug!("Skipping entry '{name}': {err}");
            return None;
        }
    };

    Some(Conference {
        name: name.to_string(),
        date: Some(span),
        city: place.city,
        country: place.country,
        location,
        hyperlink: hyperlink.to_string(),
        tags: extract_tags(name),
        cfp,
    })
}

/// Splits `"City, State (Country)"` or `"City (Country)"`.
///
/// Without a parenthesized country both fields are empty.
#[must_use]
pub fn split_location(location: &str) -> Place {
    let Some((city_part, country_part)) = location.rsplit_once('(') else {
        return Place::default();
    };

    let city_part = city_part.trim().trim_end_matches(',');
    let country = country_part.trim_end_matches(')').trim();
    let city = match city_part.split_once(',') {
        Some((city, _state)) => city.trim(),
        None => city_part,
    };

    Place {
        city: city.to_string(),
        country: country.to_string(),
    }
}

/// Extracts the CFP badge, keeping the link even when its date is unreadable.
#[must_use]
pub fn parse_cfp_badge(text: &str) -> Option<CfpWindow> {
    let caps = CFP_BADGE.captures(text)?;
    let link = caps.get(1)?.as_str().to_string();
    let encoded = caps.get(2)?.as_str();

    let until_date = decode_cfp_date(encoded);
    if until_date.is_none() {
        debug!("CFP deadline '{encoded}' could not be decoded for {link}");
    }

    Some(CfpWindow { link, until_date })
}

/// Decodes `15-November-2025` (or `15%20November%202025`) to midnight of that day.
#[must_use]
pub fn decode_cfp_date(encoded: &str) -> Option<Timestamp> {
    let text = encoded.replace("%20", " ").replace('-', " ");
    NaiveDate::parse_from_str(text.trim(), "%d %B %Y")
        .ok()
        .map(Timestamp::from_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_basic_line() {
        let line = "* 5-6: [ICSTM 2026](https://waset.org/conf) - Bali (Indonesia)";
        let conf = parse_entry_line(line, 2026, Month::January).unwrap();
        assert_eq!(conf.name, "ICSTM 2026");
        assert_eq!(conf.hyperlink, "https://waset.org/conf");
        assert_eq!(conf.city, "Bali");
        assert_eq!(conf.country, "Indonesia");
        assert_eq!(conf.location, "Bali (Indonesia)");
        let span = conf.date.unwrap();
        assert_eq!(span.beginning, ymd(2026, 1, 5));
        assert_eq!(span.end, ymd(2026, 1, 6));
        assert!(conf.cfp.is_none());
    }

    #[test]
    fn test_city_with_state() {
        let line = "* 15: [MongoDB.local](https://mongodb.com) - San Francisco, CA (USA)";
        let conf = parse_entry_line(line, 2026, Month::January).unwrap();
        assert_eq!(conf.city, "San Francisco");
        assert_eq!(conf.country, "USA");
        assert_eq!(conf.location, "San Francisco, CA (USA)");
    }

    #[test]
    fn test_missing_location() {
        let line = "* 15: [Online Summit](https://online.example)";
        let conf = parse_entry_line(line, 2026, Month::March).unwrap();
        assert_eq!(conf.location, UNKNOWN_LOCATION);
        assert!(conf.city.is_empty());
        assert!(conf.country.is_empty());
    }

    #[test]
    fn test_location_without_country() {
        let line = "* 15: [Online Summit](https://online.example) - Online";
        let conf = parse_entry_line(line, 2026, Month::March).unwrap();
        assert_eq!(conf.location, "Online");
        assert!(conf.city.is_empty());
        assert!(conf.country.is_empty());
    }

    #[test]
    fn test_cfp_badge() {
        let line = concat!(
            "* 10-11: [Test Conf](https://test.com) - Paris (France) ",
            r#"<a href="https://cfp.test.com"><img alt="CFP" "#,
            r#"src="https://img.shields.io/static/v1?label=CFP&message=until%2015-November-2025&color=green"></a>"#
        );
        let conf = parse_entry_line(line, 2026, Month::March).unwrap();
        let cfp = conf.cfp.unwrap();
        assert_eq!(cfp.link, "https://cfp.test.com");
        assert_eq!(cfp.until_date, Some(ymd(2025, 11, 15)));
        assert_eq!(conf.location, "Paris (France)");
    }

    #[test]
    fn test_cfp_badge_with_bad_date_keeps_link() {
        let line = concat!(
            "* 10-11: [Test Conf](https://test.com) - Paris (France) ",
            r#"<a href="https://cfp.test.com"><img alt="CFP" "#,
            r#"src="https://img.shields.io/static/v1?label=CFP&message=until%20sometime-soon&color=green"></a>"#
        );
        let conf = parse_entry_line(line, 2026, Month::March).unwrap();
        let cfp = conf.cfp.unwrap();
        assert_eq!(cfp.link, "https://cfp.test.com");
        assert!(cfp.until_date.is_none());
    }

    #[test]
    fn test_missing_date_token() {
        let line = "* [Invalid Conference](https://invalid.com) - City (Country)";
        assert!(parse_entry_line(line, 2026, Month::March).is_none());
    }

    #[test]
    fn test_missing_link_token() {
        let line = "* 15: Invalid Conference - City (Country)";
        assert!(parse_entry_line(line, 2026, Month::March).is_none());
    }

    #[test]
    fn test_malformed_date_token() {
        let line = "* 5/6: [Odd Conf](https://odd.example) - City (Country)";
        assert!(parse_entry_line(line, 2026, Month::March).is_none());
    }

    #[test]
    fn test_special_characters_survive() {
        let line = "* 3: [Café & Code](https://cafe.example) - Zürich (Switzerland)";
        let conf = parse_entry_line(line, 2026, Month::June).unwrap();
        assert_eq!(conf.name, "Café & Code");
        assert_eq!(conf.city, "Zürich");
    }

    #[test]
    fn test_split_location_trailing_comma() {
        let place = split_location("Lyon, (France)");
        assert_eq!(place.city, "Lyon");
        assert_eq!(place.country, "France");
    }

    #[test]
    fn test_decode_cfp_date() {
        assert_eq!(decode_cfp_date("10-December-2025"), Some(ymd(2025, 12, 10)));
        assert_eq!(decode_cfp_date("10%20December%202025"), Some(ymd(2025, 12, 10)));
        assert_eq!(decode_cfp_date("32-December-2025"), None);
    }
}
