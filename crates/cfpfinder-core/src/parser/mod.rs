//! Agenda document parser.
//!
//! The agenda is a changelog-like markdown document:
//!
//! ```text
//! ## 2026
//!
//! ### January
//!
//! * 5-6: [ICSTM 2026](https://waset.org/conf) - Bali (Indonesia)
//! * 31-01/02: [FOSDEM 2026](https://fosdem.org/2026/) - Brussels (Belgium)
//! ```
//!
//! Parsing is tolerant: lines that are not entries, and entries that cannot be
//! read, are skipped without failing the document.

mod dates;
mod entry;

use chrono::Month;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub use dates::{parse_month, resolve_date_range};
pub use entry::{
    decode_cfp_date, parse_cfp_badge, parse_entry_line, split_location, Place, UNKNOWN_LOCATION,
};

use crate::types::Conference;

static YEAR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##\s+(\d{4})$").expect("year header pattern is valid"));
static MONTH_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s+(\w+)$").expect("month header pattern is valid"));

/// Bullet marker that starts an entry line.
pub const BULLET: &str = "* ";

/// Parses a whole agenda document into conferences, in document order.
///
/// # Example
///
/// ```rust
/// use cfpfinder_core::parser::parse_document;
///
/// let doc = "## 2026\n### March\n* 15: [Conf](https://conf.example) - Paris (France)\n";
/// let conferences = parse_document(doc);
/// assert_eq!(conferences.len(), 1);
/// assert_eq!(conferences[0].country, "France");
/// ```
#[must_use]
pub fn parse_document(text: &str) -> Vec<Conference> {
    let mut conferences = Vec::new();
    let mut year: Option<i32> = None;
    let mut month: Option<Month> = None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end();

        if let Some(caps) = YEAR_HEADER.captures(line) {
            year = caps.get(1).and_then(|m| m.as_str().parse().ok());
            continue;
        }

        if let Some(caps) = MONTH_HEADER.captures(line) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            month = match parse_month(name) {
                Ok(m) => Some(m),
                Err(err) => {
                    debug!("Line {}: {err}; entries skipped until the next month", index + 1);
                    None
                }
            };
            continue;
        }

        if !line.starts_with(BULLET) {
            continue;
        }

        let (Some(year), Some(month)) = (year, month) else {
            debug!("Line {}: entry before any year/month header", index + 1);
            continue;
        };

        match parse_entry_line(line, year, month) {
            Some(conference) => conferences.push(conference),
            None => debug!("Line {}: not a conference entry", index + 1),
        }
    }

    conferences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    #[test]
    fn test_empty_document() {
        assert!(parse_document("").is_empty());
    }

    #[test]
    fn test_document_without_entries() {
        let doc = "# Developers Conferences Agenda\n\nSome intro text.\n\n## 2026\n\n### January\n";
        assert!(parse_document(doc).is_empty());
    }

    #[test]
    fn test_entries_before_headers_are_skipped() {
        let doc = "\
* 15: [Too Early](https://early.example) - Paris (France)
## 2026
* 16: [Still Too Early](https://early2.example) - Paris (France)
### March
* 17: [On Time](https://ontime.example) - Paris (France)
";
        let confs = parse_document(doc);
        assert_eq!(confs.len(), 1);
        assert_eq!(confs[0].name, "On Time");
    }

    #[test]
    fn test_multiple_months_and_years() {
        let doc = "\
## 2025

### December

* 25: [Conf 2025](https://2025.example) - City (Country)

## 2026

### January

* 15: [Conf A](https://a.example) - City A (Country A)
* 20: [Conf B](https://b.example) - City B (Country B)

### February

* 10: [Conf C](https://c.example) - City C (Country C)
";
        let confs = parse_document(doc);
        let names: Vec<_> = confs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Conf 2025", "Conf A", "Conf B", "Conf C"]);
        assert_eq!(
            confs[0].beginning(),
            Some(Timestamp::from_ymd(2025, 12, 25).unwrap())
        );
        assert_eq!(
            confs[3].beginning(),
            Some(Timestamp::from_ymd(2026, 2, 10).unwrap())
        );
    }

    #[test]
    fn test_mixed_valid_and_invalid_lines() {
        let doc = "\
## 2026
### March
* 15: [Valid Conf](https://valid.example) - Paris (France)
* This is not a valid conference line
* Invalid without link - Paris (France)
* 20: [Another Valid](https://valid2.example) - Berlin (Germany)
";
        let confs = parse_document(doc);
        let names: Vec<_> = confs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Valid Conf", "Another Valid"]);
    }

    #[test]
    fn test_unknown_month_suspends_entries() {
        let doc = "\
## 2026
### March
* 15: [March Conf](https://march.example) - Paris (France)
### Sponsors
* 16: [Orphan](https://orphan.example) - Paris (France)
### April
* 17: [April Conf](https://april.example) - Paris (France)
";
        let names: Vec<_> = parse_document(doc).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["March Conf", "April Conf"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = "## 2026\r\n### May\r\n* 4: [Conf](https://c.example) - Lyon (France)\r\n";
        let confs = parse_document(doc);
        assert_eq!(confs.len(), 1);
        assert_eq!(confs[0].country, "France");
    }
}
