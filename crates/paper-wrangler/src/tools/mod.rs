//! The five pipelines, one module each.
//!
//! Each pipeline reads its whole input, transforms it in memory and writes
//! its whole output. Network-backed pipelines await one request at a time.

pub mod affiliations;
pub mod bib_convert;
pub mod countries;
pub mod reviewers;
pub mod scrape;

pub use affiliations::{AffiliationSummary, doi_from_url, fetch_affiliations};
pub use bib_convert::{ArtifactReport, convert_bibliography, convert_with_artifacts};
pub use countries::{CountryCache, CountryModel, CountrySummary, OllamaCountryModel, extract_countries};
pub use reviewers::{AssignmentSummary, assign_reviewers, partition};
pub use scrape::{extract_entries, scrape_table};
