use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::extract::extract_birth_year;
use crate::fetch::DocumentFetcher;

/// Rows of the ranking table inside the listing page's result container.
const ROW_SELECTOR: &str = "#page_filling_chart > center > table tr";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Listing URL (page 1); page tokens and detail links resolve against it.
    pub url: String,
    /// Number of data rows to collect across all pages.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Cell separator for the rendered output.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Listing rows consumed per page-index step. The default of 1 matches
    /// sites whose page token is a 1-based row offset.
    #[serde(default = "default_rows_per_step")]
    pub rows_per_step: usize,
    /// Maximum concurrent detail-page fetches.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Selector matching the listing table's rows.
    #[serde(default = "default_row_selector")]
    pub row_selector: String,
}

fn default_limit() -> usize {
    200
}

fn default_separator() -> String {
    ";".to_string()
}

fn default_rows_per_step() -> usize {
    1
}

fn default_max_in_flight() -> usize {
    8
}

fn default_row_selector() -> String {
    ROW_SELECTOR.to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            limit: default_limit(),
            separator: default_separator(),
            rows_per_step: default_rows_per_step(),
            max_in_flight: default_max_in_flight(),
            row_selector: default_row_selector(),
        }
    }
}

/// Outcome of one row's detail-page lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// Birth year extracted from the detail page.
    Found(String),
    /// Detail page fetched, but no recognizable year on it.
    NotFound,
    /// Row had no link, or the detail fetch failed.
    Unavailable,
}

/// Everything collected across the listing pages.
///
/// `rows` and `facts` are the same length and aligned by rank, in the exact
/// order the rows were encountered. The header comes from page 1 only and does
/// not yet carry the fact column; merging appends it.
#[derive(Debug)]
pub struct Listing {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub facts: Vec<Fact>,
}

struct RawRow {
    cells: Vec<String>,
    link: Option<String>,
}

/// Walks the paginated listing and schedules detail lookups as rows are read.
///
/// Listing pages are fetched strictly in sequence because the next page token
/// is derived from how many rows have been consumed so far. Detail fetches run
/// concurrently in the background, gated by a semaphore, and are joined once
/// at the end of [`collect`](RowCollector::collect).
pub struct RowCollector<F> {
    fetcher: Arc<F>,
    row_selector: String,
    rows_per_step: usize,
    max_in_flight: usize,
}

impl<F: DocumentFetcher + 'static> RowCollector<F> {
    pub fn new(fetcher: F, config: &ScrapeConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            row_selector: config.row_selector.clone(),
            rows_per_step: config.rows_per_step.max(1),
            max_in_flight: config.max_in_flight.max(1),
        }
    }

    /// Collect exactly `limit` data rows (fewer only if a listing page fails).
    ///
    /// A listing-page failure aborts the run; detail-page failures degrade to
    /// [`Fact::Unavailable`] for their row.
    pub async fn collect(&self, limit: usize) -> Result<Listing> {
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut pending: Vec<Option<JoinHandle<Fact>>> = Vec::new();
        let mut count = 0usize;

        let first = self.fetcher.fetch("1").await?;
        let mut page_rows = self.parse_rows(&first)?;
        if page_rows.is_empty() {
            anyhow::bail!("no table rows found on the first listing page");
        }
        // Row 0 of page 1 is the header; later pages are data only.
        let header = page_rows.remove(0).cells;

        loop {
            let before = count;
            for row in page_rows {
                if count >= limit {
                    break;
                }
                if row.cells.is_empty() {
                    continue;
                }
                pending.push(row.link.map(|href| self.spawn_detail(href, &semaphore)));
                count += 1;
                rows.push(row.cells);
            }
            if count >= limit {
                break;
            }
            if count == before {
                anyhow::bail!(
                    "listing page yielded no usable rows at {} of {} collected",
                    count,
                    limit
                );
            }
            let token = (count / self.rows_per_step + 1).to_string();
            let page = self.fetcher.fetch(&token).await?;
            page_rows = self.parse_rows(&page)?;
        }

        // Fan-in barrier: every detail task finishes here, in rank order.
        let facts = join_all(pending.into_iter().map(|handle| async move {
            match handle {
                Some(task) => task.await.unwrap_or_else(|e| {
                    log::warn!("Detail task failed: {}", e);
                    Fact::Unavailable
                }),
                None => Fact::Unavailable,
            }
        }))
        .await;

        Ok(Listing { header, rows, facts })
    }

    fn parse_rows(&self, html: &str) -> Result<Vec<RawRow>> {
        let row_selector = Selector::parse(&self.row_selector)
            .map_err(|e| anyhow::anyhow!("invalid row selector: {e}"))?;
        let cell_selector = Selector::parse("td, th")
            .map_err(|e| anyhow::anyhow!("invalid cell selector: {e}"))?;
        let link_selector = Selector::parse("a")
            .map_err(|e| anyhow::anyhow!("invalid link selector: {e}"))?;

        let document = Html::parse_document(html);
        let mut rows = Vec::new();

        for tr in document.select(&row_selector) {
            let cells: Vec<String> = tr
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            let link = tr
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            rows.push(RawRow { cells, link });
        }

        Ok(rows)
    }

    fn spawn_detail(&self, href: String, semaphore: &Arc<Semaphore>) -> JoinHandle<Fact> {
        let fetcher = Arc::clone(&self.fetcher);
        let semaphore = Arc::clone(semaphore);

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Fact::Unavailable;
            };
            match fetcher.fetch(&href).await {
                Ok(html) => {
                    let document = Html::parse_document(&html);
                    match extract_birth_year(&document) {
                        Some(year) => Fact::Found(year),
                        None => Fact::NotFound,
                    }
                }
                Err(e) => {
                    log::warn!("Detail fetch failed for {}: {}", href, e);
                    Fact::Unavailable
                }
            }
        })
    }
}
