//! Fixed narrative prompt templates handed to orchestrating clients.
//!
//! Templates reference the `search_conferences` tool and its field names so
//! a model can turn them straight into tool calls.

/// Name of the search tool the templates refer to.
pub const SEARCH_TOOL: &str = "search_conferences";

/// Asks the model to find conferences in `country` whose CFP is still open
/// and to match them against the available CFP write-ups.
#[must_use]
pub fn find_conferences_for_open_cfps(country: &str) -> String {
    format!(
        "I want to submit my talk proposals to conferences in {country}.\n\n\
         1. Call the `{SEARCH_TOOL}` tool with `country` set to \"{country}\", \
         `cfp_open` set to true and `match_cfps` set to true.\n\
         2. For every CFP in the result, list the matching conferences with their \
         `match_score`, `match_reasoning`, dates (`dateFormatted`), `location` and \
         the CFP deadline (`cfp.untilDate`).\n\
         3. Recommend where each talk should be submitted first, favouring the \
         highest scores and the closest deadlines.\n\n\
         Answer in a concise, readable format."
    )
}

/// Asks the model for a narrative overview of the conferences held in
/// `month` in `country`.
#[must_use]
pub fn conferences_by_month(month: &str, year: i32, country: &str) -> String {
    format!(
        "Give me an overview of the developer conferences happening in {country} \
         during {month} {year}.\n\n\
         Call the `{SEARCH_TOOL}` tool with `country` set to \"{country}\" and \
         `min_date`/`max_date` covering {month} {year} (format YYYY-MM-DD). \
         For each conference mention its `name`, `dateFormatted`, `city`, its `tags` \
         and whether a CFP (`cfp`) is still open. Group them by week."
    )
}
