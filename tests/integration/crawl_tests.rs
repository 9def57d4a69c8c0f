//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small directory and run the full
//! harvest cycle end-to-end through the real HTTP fetcher.

use std::path::Path;
use sumi_gather::config::Config;
use sumi_gather::crawler::{harvest, FetchError, HttpFetcher, PageFetcher};
use sumi_gather::output::UTF8_BOM;
use sumi_gather::record::DATASET_COLUMNS;
use sumi_gather::{ConfigError, GatherError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server, without delays
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.http.user_agent = "TestGatherer/1.0".to_string();
    config.http.timeout_secs = 5;
    config.listing.min_delay = 0.0;
    config.listing.max_delay = 0.0;
    config.listing.backoff_delay = 0.0;
    config.detail.min_delay = 0.0;
    config.detail.max_delay = 0.0;
    config.detail.backoff_delay = 0.0;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing(hrefs: &[&str]) -> ResponseTemplate {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="yp-listing-title"><h3><a href="{}">item</a></h3></div>"#,
                href
            )
        })
        .collect();
    html(&items)
}

/// Reads a dataset back into rows, checking the BOM and header
fn read_dataset(path: &Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path).expect("Failed to read dataset");
    assert!(bytes.starts_with(UTF8_BOM));

    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing header row")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, DATASET_COLUMNS.to_vec());

    reader
        .records()
        .map(|row| {
            row.expect("Malformed row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_full_harvest_single_category() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Category page lists tennis twice and golf once
    Mock::given(method("GET"))
        .and(path("/category/sport"))
        .respond_with(html(
            r#"<a href="/heading/tennis">Tennis</a>
               <a href="/heading/tennis">Tennis courts</a>
               <a href="/heading/golf">Golf</a>
               <a href="/about">About us</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Tennis: two listing pages, then three empty pages end the subcategory.
    // Query-specific mocks are mounted before the bare path so they win.
    Mock::given(method("GET"))
        .and(path("/heading/tennis"))
        .and(query_param("page", "2"))
        .respond_with(listing(&["/biz/t2"]))
        .mount(&mock_server)
        .await;

    for page in ["3", "4", "5"] {
        Mock::given(method("GET"))
            .and(path("/heading/tennis"))
            .and(query_param("page", page))
            .respond_with(html("<p>ไม่พบข้อมูล</p>"))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/heading/tennis"))
        .and(query_param("page", "6"))
        .respond_with(listing(&["/biz/never"]))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/heading/tennis"))
        .respond_with(listing(&["/biz/t1a", "/biz/t1b"]))
        .mount(&mock_server)
        .await;

    // Golf: every page errors, three failed pages end the subcategory
    Mock::given(method("GET"))
        .and(path("/heading/golf"))
        .respond_with(ResponseTemplate::new(500))
        .expect(9)
        .mount(&mock_server)
        .await;

    // Complete detail page
    Mock::given(method("GET"))
        .and(path("/biz/t1a"))
        .respond_with(html(
            r#"<h1>สนามเทนนิส ลุมพินี</h1>
               <div><div><strong>ที่อยู่</strong></div><div>ถนนพระราม 4 กรุงเทพฯ</div></div>
               <a href="tel:022528888">02-252-8888</a>
               <a href="https://www.google.com/maps?q=13.73,100.54">นำทาง</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Detail page missing its name twice before it renders fully
    Mock::given(method("GET"))
        .and(path("/biz/t1b"))
        .respond_with(html("<p>กำลังโหลด</p>"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/biz/t1b"))
        .respond_with(html("<h1>Racket Club</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Detail page that never loads is skipped after four attempts
    Mock::given(method("GET"))
        .and(path("/biz/t2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(4)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("yellowpages_sport.csv");

    let summary = harvest(create_test_config(&base_url), "sport", &output)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.subcategories, 2);
    assert_eq!(summary.subcategories_completed, 2);
    assert_eq!(summary.pages_listed, 2);
    assert_eq!(summary.pages_empty, 3);
    assert_eq!(summary.pages_failed, 3);
    assert_eq!(summary.items_extracted, 2);
    assert_eq!(summary.items_skipped, 1);

    let rows = read_dataset(&output);
    assert_eq!(rows.len(), 2);

    assert_eq!(
        rows[0],
        vec![
            "Tennis".to_string(),
            "สนามเทนนิส ลุมพินี".to_string(),
            "ถนนพระราม 4 กรุงเทพฯ".to_string(),
            "02-252-8888".to_string(),
            "https://www.google.com/maps?q=13.73,100.54".to_string(),
            "No Description".to_string(),
            format!("{}/biz/t1a", base_url),
        ]
    );

    assert_eq!(rows[1][0], "Tennis");
    assert_eq!(rows[1][1], "Racket Club");
    assert_eq!(rows[1][2], "Unknown");
    assert_eq!(rows[1][3], "No Phone");
    assert_eq!(rows[1][4], "No Map");

    // Wiremock verifies the expected call counts when mock_server drops
}

#[tokio::test]
async fn test_no_subcategories_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category/empty"))
        .respond_with(html("<p>No headings here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("yellowpages_empty.csv");

    let summary = harvest(create_test_config(&mock_server.uri()), "empty", &output)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.subcategories, 0);
    assert_eq!(summary.total_pages(), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_blank_category_rejected_before_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<p>unused</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("yellowpages_.csv");

    let result = harvest(create_test_config(&mock_server.uri()), "  ", &output).await;

    assert!(matches!(
        result,
        Err(GatherError::Config(ConfigError::Validation(_)))
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_invalid_base_url_is_a_url_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("yellowpages_sport.csv");

    let result = harvest(create_test_config("not a url"), "sport", &output).await;

    assert!(matches!(result, Err(GatherError::UrlError(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_http_fetcher_classifies_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<h1>ok</h1>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/unavailable"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::new(&config.http).expect("Failed to build fetcher");
    let base = mock_server.uri();

    let body = fetcher
        .fetch(&format!("{}/ok", base))
        .await
        .expect("Fetch failed");
    assert!(body.contains("<h1>ok</h1>"));

    let blank = fetcher.fetch(&format!("{}/blank", base)).await;
    assert!(matches!(blank, Err(FetchError::EmptyBody { .. })));

    let unavailable = fetcher.fetch(&format!("{}/unavailable", base)).await;
    assert!(matches!(
        unavailable,
        Err(FetchError::Status { status: 503, .. })
    ));

    fetcher.shutdown().await;

    let closed = fetcher.fetch(&format!("{}/ok", base)).await;
    assert!(matches!(closed, Err(FetchError::Closed { .. })));
}
