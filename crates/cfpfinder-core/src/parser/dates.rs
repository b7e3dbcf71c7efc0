//! Date token resolution for agenda entries.
//!
//! Tokens are resolved against the year and month headers that enclose the
//! entry. Three forms are accepted:
//!
//! | token      | meaning                                              |
//! |------------|------------------------------------------------------|
//! | `15`       | single day                                           |
//! | `5-6`      | range within the enclosing month                     |
//! | `31-01/02` | start in the enclosing month, end in the next month  |

use chrono::{Month, NaiveDate};

use crate::error::{CfpError, CfpResult};
use crate::types::{DateSpan, Timestamp};

/// Parses a full English month name (`"January"`, case-insensitive).
///
/// Abbreviations such as `"Mar"` are rejected.
///
/// # Errors
///
/// Returns `CfpError::InvalidMonth` for anything that is not one of the
/// twelve calendar month names.
pub fn parse_month(name: &str) -> CfpResult<Month> {
    let trimmed = name.trim();
    trimmed
        .parse::<Month>()
        .ok()
        .filter(|month| month.name().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| CfpError::InvalidMonth {
            name: name.to_string(),
        })
}

/// Resolves a raw date token into an inclusive span.
///
/// # Errors
///
/// Returns `CfpError::InvalidDateToken` when the token does not follow one of
/// the accepted forms or names a day that does not exist.
pub fn resolve_date_range(token: &str, year: i32, month: Month) -> CfpResult<DateSpan> {
    let month_num = month.number_from_month();

    if let Some((start, rest)) = token.split_once('-') {
        let start_day = parse_day(token, start)?;
        let beginning = day_in(token, year, month_num, start_day)?;

        if rest.contains('/') {
            // End day lives in the following month; December rolls into January.
            let end_part = rest.split('/').next().unwrap_or_default();
            let end_day = parse_day(token, end_part)?;
            let (next_year, next_month) = if month_num == 12 {
                (year + 1, 1)
            } else {
                (year, month_num + 1)
            };
            let end = day_in(token, next_year, next_month, end_day)?;
            return Ok(DateSpan { beginning, end });
        }

        // Same-month range: start is trusted to precede end.
        let end_day = parse_day(token, rest)?;
        let end = day_in(token, year, month_num, end_day)?;
        return Ok(DateSpan { beginning, end });
    }

    if token.contains('/') {
        return Err(CfpError::invalid_date_token(
            token,
            "month separator without a range",
        ));
    }

    let day = parse_day(token, token)?;
    Ok(DateSpan::single(day_in(token, year, month_num, day)?))
}

fn parse_day(token: &str, part: &str) -> CfpResult<u32> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CfpError::invalid_date_token(
            token,
            format!("'{part}' is not a day number"),
        ));
    }
    part.parse::<u32>()
        .map_err(|e| CfpError::invalid_date_token(token, e.to_string()))
}

fn day_in(token: &str, year: i32, month: u32, day: u32) -> CfpResult<Timestamp> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Timestamp::from_date)
        .ok_or_else(|| {
            CfpError::invalid_date_token(token, format!("{year}-{month:02}-{day:02} does not exist"))
        })
}
