//! Program page scraping against a mock conference site.

use std::fs;

use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_wrangler::models::{OutputFormat, ScrapedEntry};
use paper_wrangler::tools::scrape::{output_path, save_entries};
use paper_wrangler::tools::scrape_table;
use paper_wrangler::{Config, WranglerClient};

const PROGRAM: &str = r#"<!DOCTYPE html>
<html><body>
<table class="session-table">
  <tr><td>09:00</td><td><a href="/details/1">Learning to Fix Builds</a>
      <div class="performers">Grace Hopper, Alan Turing</div></td></tr>
  <tr><td>09:20</td><td></td></tr>
  <tr><td>09:40</td><td><a href="/details/2">Neural Test Oracles</a>
      <div class="performers">Barbara Liskov</div></td></tr>
</table>
</body></html>"#;

async fn setup() -> (MockServer, WranglerClient) {
    let server = MockServer::start().await;
    let client = WranglerClient::new(&Config::for_testing(&server.uri())).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_scrape_and_save_csv() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/track/icse-2024-papers"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROGRAM))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/track/icse-2024-papers", server.uri());
    let entries = scrape_table(&client, &url).await.unwrap();
    assert_eq!(
        entries,
        vec![
            ScrapedEntry {
                title: "Learning to Fix Builds".into(),
                authors: "Grace Hopper, Alan Turing".into(),
            },
            ScrapedEntry { title: "Neural Test Oracles".into(), authors: "Barbara Liskov".into() },
        ]
    );

    let dir = tempfile::tempdir().unwrap();
    let out = output_path(dir.path(), "2024", OutputFormat::Csv);
    assert!(save_entries(&entries, &out, OutputFormat::Csv).unwrap());
    assert!(out.ends_with("researchr/2024_papers.csv"));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("title,authors\n"));
    assert!(text.contains("Learning to Fix Builds,\"Grace Hopper, Alan Turing\""));
}

#[tokio::test]
async fn test_page_failure_is_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = scrape_table(&client, &format!("{}/program", server.uri())).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_page_writes_nothing() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let entries = scrape_table(&client, &format!("{}/program", server.uri())).await.unwrap();
    assert!(entries.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let out = output_path(dir.path(), "2024", OutputFormat::Json);
    assert!(!save_entries(&entries, &out, OutputFormat::Json).unwrap());
    assert!(!out.exists());
}
