//! Conference program table scraper.
//!
//! Fetches one page and reads papers out of its table rows: a paper row has
//! at least two cells and a non-empty second cell, whose first link is the
//! title and whose `div.performers` holds the author line.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::bibtex::normalize_whitespace;
use crate::client::WranglerClient;
use crate::config::paths;
use crate::error::ToolResult;
use crate::formatters::{csv::write_rows, json::write_pretty, results_path};
use crate::models::{OutputFormat, ScrapedEntry};

struct TableSelectors {
    row: Selector,
    cell: Selector,
    link: Selector,
    performers: Selector,
}

static SELECTORS: LazyLock<TableSelectors> = LazyLock::new(|| TableSelectors {
    row: Selector::parse("tr").expect("valid row selector"),
    cell: Selector::parse("td").expect("valid cell selector"),
    link: Selector::parse("a").expect("valid link selector"),
    performers: Selector::parse("div.performers").expect("valid performers selector"),
});

/// All text below `element`, concatenated then whitespace-collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// The cell holding paper details, if `row` looks like a paper row.
fn paper_cell(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let cell = row.select(&SELECTORS.cell).nth(1)?;
    (!element_text(cell).is_empty()).then_some(cell)
}

fn entry_from_cell(cell: ElementRef<'_>) -> Option<ScrapedEntry> {
    let title = cell.select(&SELECTORS.link).next().map(element_text)?;
    if title.is_empty() {
        return None;
    }

    let authors = cell.select(&SELECTORS.performers).next().map(element_text).unwrap_or_default();
    tracing::debug!(content = %element_text(cell), "Paper cell");
    Some(ScrapedEntry { title, authors })
}

/// Extract every titled paper row from a program page.
#[must_use]
pub fn extract_entries(html: &str) -> Vec<ScrapedEntry> {
    let document = Html::parse_document(html);

    let cells: Vec<ElementRef<'_>> =
        document.select(&SELECTORS.row).filter_map(paper_cell).collect();
    if cells.is_empty() {
        tracing::warn!("No paper rows found");
        return Vec::new();
    }
    tracing::info!(rows = cells.len(), "Found potential paper rows");

    cells
        .into_iter()
        .filter_map(entry_from_cell)
        .inspect(|entry| tracing::info!(title = %entry.title, "Extracted"))
        .collect()
}

/// Fetch `url` once and extract its paper rows.
pub async fn scrape_table(client: &WranglerClient, url: &str) -> ToolResult<Vec<ScrapedEntry>> {
    tracing::info!(url = %url, "Fetching");
    let html = client.fetch_page(url).await?;
    let entries = extract_entries(&html);
    tracing::info!(papers = entries.len(), "Total papers scraped");
    Ok(entries)
}

/// `<results_dir>/researchr/<year>_papers.<ext>`.
#[must_use]
pub fn output_path(results_dir: &Path, year: &str, format: OutputFormat) -> PathBuf {
    results_path(
        results_dir,
        paths::SCRAPE_SUBDIR,
        &format!("{year}_papers.{}", format.extension()),
    )
}

/// Write scraped entries in `format`. Returns false (and writes nothing) when there are none.
pub fn save_entries(entries: &[ScrapedEntry], path: &Path, format: OutputFormat) -> ToolResult<bool> {
    if entries.is_empty() {
        tracing::warn!("No papers to save");
        return Ok(false);
    }

    match format {
        OutputFormat::Csv => {
            write_rows(path, ScrapedEntry::COLUMNS, entries)?;
        }
        OutputFormat::Json => write_pretty(path, entries)?,
    }
    tracing::info!(papers = entries.len(), output = %path.display(), "Saved papers");
    Ok(true)
}
