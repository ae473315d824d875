use regex::Regex;
use scraper::{Html, Selector};

/// Rows of the secondary-info table on a star's detail page.
const INFO_ROW_SELECTOR: &str = "#col2mid > table tr";

/// Label marking the biography row the year is read from.
const BORN_LABEL: &str = "Born:";

/// Extract the 4-digit birth year from a star's detail page.
///
/// Takes the first secondary-info row whose text contains `Born:`, then the
/// text of that row's first link, and matches a run of exactly four digits not
/// adjacent to other digits, so `"July 9, 1973 (age 51)"` yields `"1973"`.
/// Any miss (no row, no link, no year) returns `None`; a detail page without
/// the row is normal, not an error.
pub fn extract_birth_year(document: &Html) -> Option<String> {
    let row_selector = Selector::parse(INFO_ROW_SELECTOR).ok()?;
    let link_selector = Selector::parse("a").ok()?;
    // The regex crate has no look-around; the digit boundary is spelled out as
    // non-digit-or-edge context around the captured run.
    let year = Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").ok()?;

    let row = document
        .select(&row_selector)
        .find(|tr| tr.text().collect::<String>().contains(BORN_LABEL))?;

    let link = row.select(&link_selector).next()?;
    let text = link.text().collect::<String>();
    let text = text.trim();

    match year.captures(text).and_then(|caps| caps.get(1)) {
        Some(m) => Some(m.as_str().to_string()),
        None => {
            log::debug!("No 4-digit year in link text {:?}", text);
            None
        }
    }
}
