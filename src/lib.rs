// Star-records scraper library
//
// Collects the paginated box-office star-records table, enriches each row
// with the star's birth year scraped from their detail page, and renders the
// merged table as delimited text.

pub mod collector;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod utils;

// Re-export main types for convenience
pub use collector::{Fact, Listing, RowCollector, ScrapeConfig};
pub use export::{merge_rows, render_delimited, save_csv, FACT_COLUMN};
pub use extract::extract_birth_year;
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use utils::{get_random_user_agent, utc_date_suffix, USER_AGENTS};
