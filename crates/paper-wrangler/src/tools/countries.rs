//! Country inference for affiliation strings via a local language model.
//!
//! Each distinct affiliation is asked about once per run. Answers are
//! normalized through a small synonym table, and failed calls store the
//! `Error` sentinel instead of aborting. Rows that already carry a country
//! are left untouched, so re-running on an enriched file only fills gaps.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::client::WranglerClient;
use crate::error::{ClientResult, ToolResult};
use crate::formatters::csv::{read_table, write_table};
use crate::models::CountryRow;

/// Stored when the model call fails.
pub const ERROR_SENTINEL: &str = "Error";

/// Column holding the inferred country.
const COUNTRY_COLUMN: &str = "country";

/// Number of countries reported in the run summary.
const DISTRIBUTION_TOP: usize = 15;

/// Model answers rewritten to a canonical country name.
const COUNTRY_SYNONYMS: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("US", "United States"),
    ("United States of America", "United States"),
    ("UK", "United Kingdom"),
];

/// Prompt sent for one affiliation.
#[must_use]
pub fn country_prompt(affiliation: &str) -> String {
    format!(
        "Get the country from this academic affiliation. Return only the country name, \
         nothing else.\n\nAffiliation: {affiliation}\n\nCountry:"
    )
}

/// Trim a model answer and map known synonyms.
#[must_use]
pub fn normalize_country(raw: &str) -> String {
    let answer = raw.trim();
    COUNTRY_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == answer)
        .map_or_else(|| answer.to_string(), |(_, canonical)| (*canonical).to_string())
}

/// Something that can name the country of an affiliation.
#[async_trait::async_trait]
pub trait CountryModel: Send + Sync {
    /// Raw answer for `affiliation`, before normalization.
    async fn ask_country(&self, affiliation: &str) -> ClientResult<String>;
}

/// [`CountryModel`] backed by an Ollama chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaCountryModel {
    client: WranglerClient,
    model: String,
}

impl OllamaCountryModel {
    #[must_use]
    pub fn new(client: WranglerClient, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl CountryModel for OllamaCountryModel {
    async fn ask_country(&self, affiliation: &str) -> ClientResult<String> {
        self.client.chat(&self.model, &country_prompt(affiliation)).await
    }
}

/// Affiliation to country answers collected during one run.
#[derive(Debug, Clone, Default)]
pub struct CountryCache {
    answers: HashMap<String, String>,
}

impl CountryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, affiliation: &str) -> Option<&str> {
        self.answers.get(affiliation).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Cached country for `affiliation`, asking the model on a miss.
    pub async fn country_for(&mut self, model: &dyn CountryModel, affiliation: &str) -> String {
        if let Some(country) = self.get(affiliation) {
            return country.to_string();
        }

        let country = match model.ask_country(affiliation).await {
            Ok(raw) => normalize_country(&raw),
            Err(e) => {
                let preview: String = affiliation.chars().take(50).collect();
                tracing::error!(affiliation = %preview, error = %e, "Country lookup failed");
                ERROR_SENTINEL.to_string()
            }
        };
        self.answers.insert(affiliation.to_string(), country.clone());
        country
    }
}

/// Fill in missing countries.
///
/// A row is filled when its country is empty (or, with `retry_errors`, the
/// error sentinel) and its affiliation is not blank. Every other row is
/// returned unchanged.
pub async fn enrich_rows(
    model: &dyn CountryModel,
    cache: &mut CountryCache,
    mut rows: Vec<CountryRow>,
    retry_errors: bool,
) -> Vec<CountryRow> {
    let pending: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.needs_country(retry_errors) && !row.affiliations.trim().is_empty())
        .map(|(index, _)| index)
        .collect();

    let mut seen = HashSet::new();
    let unique: Vec<String> = pending
        .iter()
        .map(|&index| rows[index].affiliations.clone())
        .filter(|affiliation| seen.insert(affiliation.clone()))
        .collect();

    tracing::info!(rows = pending.len(), unique = unique.len(), "Processing unique affiliations");
    for (done, affiliation) in unique.iter().enumerate() {
        tracing::info!(
            "Progress: {}/{} ({:.1}%)",
            done,
            unique.len(),
            done as f64 / unique.len() as f64 * 100.0
        );
        cache.country_for(model, affiliation).await;
    }

    for index in pending {
        let row = &mut rows[index];
        if let Some(country) = cache.get(&row.affiliations) {
            row.country = country.to_string();
        }
    }
    rows
}

/// Countries by frequency, most common first, ties alphabetical. Empty values are ignored.
#[must_use]
pub fn country_distribution(rows: &[CountryRow]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let country = row.country.trim();
        if !country.is_empty() {
            *counts.entry(country).or_default() += 1;
        }
    }

    let mut distribution: Vec<(String, usize)> =
        counts.into_iter().map(|(country, count)| (country.to_string(), count)).collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

/// `<dir>/<stem>_with_countries.csv` next to the input.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_with_countries.csv"))
}

/// Outcome of a country run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountrySummary {
    /// Rows written.
    pub rows: usize,
    /// Distinct affiliations sent to the model.
    pub lookups: usize,
    /// Most common countries, at most fifteen.
    pub top_countries: Vec<(String, usize)>,
}

/// Read an affiliation table, fill missing countries and write the result.
///
/// Every input column is kept in place; `country` is appended when absent.
pub async fn extract_countries(
    model: &dyn CountryModel,
    input: &Path,
    output: &Path,
    retry_errors: bool,
) -> ToolResult<CountrySummary> {
    let mut table = read_table(input)?;
    if table.column(COUNTRY_COLUMN).is_some() {
        tracing::info!(
            rows = table.records.len(),
            "Country column exists, updating missing values only"
        );
    } else {
        tracing::info!(rows = table.records.len(), "Adding country column");
    }
    let country_column = table.ensure_column(COUNTRY_COLUMN);
    let rows: Vec<CountryRow> = table.rows()?;

    let mut cache = CountryCache::new();
    let rows = enrich_rows(model, &mut cache, rows, retry_errors).await;
    for (index, row) in rows.iter().enumerate() {
        table.set(index, country_column, &row.country);
    }

    let written = write_table(output, &table)?;
    tracing::info!(output = %output.display(), "Results saved");

    let mut top_countries = country_distribution(&rows);
    top_countries.truncate(DISTRIBUTION_TOP);
    for (country, count) in &top_countries {
        tracing::info!(country = %country, count, "Country distribution");
    }

    Ok(CountrySummary { rows: written, lookups: cache.len(), top_countries })
}
