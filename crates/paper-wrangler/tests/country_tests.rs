//! Country inference against a mock Ollama server.

use std::fs;
use std::path::{Path, PathBuf};

use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_wrangler::models::CountryRow;
use paper_wrangler::tools::{OllamaCountryModel, extract_countries};
use paper_wrangler::{Config, WranglerClient};

// =============================================================================
// Setup
// =============================================================================

async fn setup() -> (MockServer, OllamaCountryModel) {
    let server = MockServer::start().await;
    let config = Config::for_testing(&server.uri());
    let client = WranglerClient::new(&config).unwrap();
    (server, OllamaCountryModel::new(client, config.model))
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "model": "test-model",
        "created_at": "2024-05-01T10:00:00Z",
        "message": {"role": "assistant", "content": content},
        "done": true
    }))
}

async fn answer(server: &MockServer, affiliation: &str, content: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(format!("Affiliation: {affiliation}")))
        .respond_with(chat_reply(content))
        .expect(times)
        .mount(server)
        .await;
}

fn write_table(dir: &Path, header: &str, rows: &[&str]) -> PathBuf {
    let mut text = format!("{header}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let input = dir.join("affiliations.csv");
    fs::write(&input, text).unwrap();
    input
}

fn read_rows(path: &Path) -> Vec<CountryRow> {
    csv::Reader::from_path(path).unwrap().deserialize().map(Result::unwrap).collect()
}

const BASE_HEADER: &str = "reviewer,relevant,title,original_authors,url,extracted_author,affiliations";

// =============================================================================
// Extraction
// =============================================================================

#[tokio::test]
async fn test_repeated_affiliation_asked_once() {
    let (server, model) = setup().await;
    answer(&server, "MIT", " USA\n", 1).await;
    answer(&server, "ETH Zurich", "Switzerland", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(
        dir.path(),
        BASE_HEADER,
        &[
            "DW,,P1,A,u,Ada,MIT",
            "DW,,P1,A,u,Bob,MIT",
            "AA,,P2,B,u,Cyd,ETH Zurich",
            "AA,,P2,B,u,Dee,",
            "AA,,P3,C,u,Eve,MIT",
        ],
    );
    let output = dir.path().join("out.csv");

    let summary = extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.lookups, 2);
    assert_eq!(
        summary.top_countries,
        vec![("United States".to_string(), 3), ("Switzerland".to_string(), 1)]
    );

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with(&format!("{BASE_HEADER},country\n")));

    let countries: Vec<String> = read_rows(&output).into_iter().map(|r| r.country).collect();
    assert_eq!(
        countries,
        vec!["United States", "United States", "Switzerland", "", "United States"]
    );
}

#[tokio::test]
async fn test_request_shape() {
    let (server, model) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "stream": false,
            "options": {"temperature": 0.0}
        })))
        .respond_with(chat_reply("Japan"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), BASE_HEADER, &["DW,,P,A,u,Ada,University of Tokyo"]);
    let output = dir.path().join("out.csv");

    extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(read_rows(&output)[0].country, "Japan");
}

#[tokio::test]
async fn test_existing_countries_kept() {
    let (server, model) = setup().await;
    answer(&server, "Oxford", "UK", 1).await;
    answer(&server, "KTH", "Sweden", 0).await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(
        dir.path(),
        &format!("{BASE_HEADER},country"),
        &[
            "DW,,P,A,u,Ada,Oxford,England",
            "DW,,P,A,u,Bob,Oxford,",
            "DW,,P,A,u,Cyd,KTH,Sweden",
        ],
    );
    let output = dir.path().join("out.csv");

    let summary = extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(summary.lookups, 1);

    let countries: Vec<String> = read_rows(&output).into_iter().map(|r| r.country).collect();
    assert_eq!(countries, vec!["England", "United Kingdom", "Sweden"]);
}

#[tokio::test]
async fn test_model_failure_records_sentinel() {
    let (server, model) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), BASE_HEADER, &["DW,,P,A,u,Ada,Nowhere Institute"]);
    let output = dir.path().join("out.csv");

    extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(read_rows(&output)[0].country, "Error");
}

#[tokio::test]
async fn test_rerun_on_output_is_stable() {
    let (server, model) = setup().await;
    answer(&server, "MIT", "USA", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(dir.path(), BASE_HEADER, &["DW,,P,A,u,Ada,MIT"]);
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    extract_countries(&model, &input, &first, false).await.unwrap();
    let summary = extract_countries(&model, &first, &second, false).await.unwrap();

    assert_eq!(summary.lookups, 0);
    assert_eq!(fs::read_to_string(&first).unwrap(), fs::read_to_string(&second).unwrap());
}

#[tokio::test]
async fn test_retry_errors_reasks_sentinel_rows() {
    let (server, model) = setup().await;
    answer(&server, "KTH", "Sweden", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let input =
        write_table(dir.path(), &format!("{BASE_HEADER},country"), &["DW,,P,A,u,Ada,KTH,Error"]);
    let output = dir.path().join("out.csv");

    extract_countries(&model, &input, &output, true).await.unwrap();
    assert_eq!(read_rows(&output)[0].country, "Sweden");
}

#[tokio::test]
async fn test_extra_columns_survive() {
    let (server, model) = setup().await;
    answer(&server, "MIT", "USA", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(
        dir.path(),
        &format!("{BASE_HEADER},notes"),
        &["DW,,P,A,u,Ada,MIT,keep me", "DW,,P,A,u,Bob,,\"also, this\""],
    );
    let output = dir.path().join("out.csv");

    extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!(
            "{BASE_HEADER},notes,country\n\
             DW,,P,A,u,Ada,MIT,keep me,United States\n\
             DW,,P,A,u,Bob,,\"also, this\",\n"
        )
    );
}

#[tokio::test]
async fn test_country_column_keeps_its_position() {
    let (server, model) = setup().await;
    answer(&server, "KTH", "Sweden", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_table(
        dir.path(),
        "country,affiliations,extracted_author",
        &[",KTH,Ada", "Japan,University of Tokyo,Bob"],
    );
    let output = dir.path().join("out.csv");

    let summary = extract_countries(&model, &input, &output, false).await.unwrap();
    assert_eq!(summary.lookups, 1);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "country,affiliations,extracted_author\nSweden,KTH,Ada\nJapan,University of Tokyo,Bob\n"
    );
}
