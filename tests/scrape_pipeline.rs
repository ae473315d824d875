// End-to-end pipeline test against a mock HTTP server: two listing pages,
// three detail lookups (one year found, one page without the year, one
// link-less row), asserting the exact rendered CSV and the file on disk.

use std::fs;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use star_scraper::{
    merge_rows, render_delimited, save_csv, HttpFetcher, RowCollector, ScrapeConfig,
};

const LISTING_PAGE_1: &str = r#"<html><body>
<div id="page_filling_chart"><center><table>
    <tr><th>Rank</th><th>Name</th></tr>
    <tr><td>1</td><td><a href="/person/alice">Alice</a></td></tr>
    <tr><td>2</td><td><a href="/person/bob">Bob</a></td></tr>
</table></center></div>
</body></html>"#;

const LISTING_PAGE_3: &str = r#"<html><body>
<div id="page_filling_chart"><center><table>
    <tr><td>3</td><td>Carol</td></tr>
    <tr><td>4</td><td>Dave</td></tr>
</table></center></div>
</body></html>"#;

const ALICE_DETAIL: &str = r#"<html><body>
<div id="col2mid"><table>
    <tr><td>Born:</td><td><a href="/daily/1973/07/09">July 9, 1973</a> (age 51)</td></tr>
</table></div>
</body></html>"#;

const BOB_DETAIL: &str = r#"<html><body>
<div id="col2mid"><table>
    <tr><td>Breakdown:</td><td>Domestic</td></tr>
</table></div>
</body></html>"#;

async fn mount(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrapes_merges_and_writes_the_csv() {
    let server = MockServer::start().await;
    mount(&server, "/1", LISTING_PAGE_1).await;
    mount(&server, "/3", LISTING_PAGE_3).await;
    mount(&server, "/person/alice", ALICE_DETAIL).await;
    mount(&server, "/person/bob", BOB_DETAIL).await;

    let config = ScrapeConfig {
        url: server.uri(),
        limit: 3,
        ..ScrapeConfig::default()
    };

    let fetcher = HttpFetcher::new(&config.url).unwrap();
    let collector = RowCollector::new(fetcher, &config);
    let listing = collector.collect(config.limit).await.unwrap();

    let table = merge_rows(listing);
    let csv = render_delimited(&table, &config.separator);

    assert_eq!(csv, "Rank;Name;BirthYear\n1;Alice;1973\n2;Bob;\n3;Carol;");

    let dir = std::env::temp_dir().join(format!("star-scraper-e2e-{}", std::process::id()));
    let file = dir.join("stars.csv");
    save_csv(&file, &csv).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), csv);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn unreachable_listing_page_aborts_the_run() {
    let server = MockServer::start().await;
    mount(&server, "/1", LISTING_PAGE_1).await;
    // No mock for /3: the second listing fetch gets a 404 and the run fails.

    let config = ScrapeConfig {
        url: server.uri(),
        limit: 3,
        ..ScrapeConfig::default()
    };

    let fetcher = HttpFetcher::new(&config.url).unwrap();
    let collector = RowCollector::new(fetcher, &config);
    assert!(collector.collect(config.limit).await.is_err());
}
