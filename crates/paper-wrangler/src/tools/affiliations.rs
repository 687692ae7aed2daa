//! Per-author affiliations from Crossref.
//!
//! Each input row whose URL is a `doi.org` link is looked up once; the
//! work's author list is flattened into one output row per author. Rows
//! without a DOI, and lookups that fail, are logged and skipped.

use std::path::Path;

use url::Url;

use crate::client::WranglerClient;
use crate::error::ToolResult;
use crate::formatters::csv::{read_rows, write_rows};
use crate::models::{AffiliationRow, PaperReference, Work};

/// Host whose path is the DOI itself.
const DOI_RESOLVER_HOST: &str = "doi.org";

/// Extract the DOI from a `https://doi.org/<doi>` link.
///
/// Any other host, an unparseable URL, or an empty path yields `None`.
#[must_use]
pub fn doi_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if parsed.host_str()? != DOI_RESOLVER_HOST {
        return None;
    }

    let doi = parsed.path().trim_start_matches('/');
    (!doi.is_empty()).then(|| doi.to_string())
}

/// One row per author of `work`, carrying the reference's columns.
#[must_use]
pub fn author_rows(reference: &PaperReference, work: &Work) -> Vec<AffiliationRow> {
    work.author
        .iter()
        .map(|author| AffiliationRow {
            reviewer: reference.reviewer.clone(),
            relevant: reference.relevant.clone(),
            title: reference.title.clone(),
            original_authors: reference.authors.clone(),
            url: reference.url.clone(),
            extracted_author: author.full_name(),
            affiliations: author.affiliation_names(),
        })
        .collect()
}

/// Outcome of an affiliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffiliationSummary {
    /// Input rows read.
    pub papers: usize,
    /// Rows skipped because the URL carried no DOI.
    pub without_doi: usize,
    /// Rows skipped because the lookup failed.
    pub failed: usize,
    /// Author rows written.
    pub rows: usize,
}

/// Look up every input row and write the flattened author table.
///
/// The output file is always written, possibly with only a header.
pub async fn fetch_affiliations(
    client: &WranglerClient,
    input: &Path,
    output: &Path,
) -> ToolResult<AffiliationSummary> {
    let references: Vec<PaperReference> = read_rows(input)?;
    let mut summary = AffiliationSummary { papers: references.len(), ..Default::default() };
    let mut rows = Vec::new();

    for reference in &references {
        let Some(doi) = doi_from_url(&reference.url) else {
            tracing::warn!(url = %reference.url, "Could not extract DOI, skipping");
            summary.without_doi += 1;
            continue;
        };

        tracing::info!(doi = %doi, "Fetching metadata");
        match client.fetch_work(&doi).await {
            Ok(work) => {
                tracing::debug!(doi = ?work.doi, authors = work.author.len(), "Fetched work");
                rows.extend(author_rows(reference, &work));
            }
            Err(e) => {
                tracing::error!(
                    doi = %doi,
                    status = ?e.status(),
                    error = %e,
                    "Metadata lookup failed, skipping"
                );
                summary.failed += 1;
            }
        }
    }

    summary.rows = write_rows(output, AffiliationRow::COLUMNS, &rows)?;
    tracing::info!(
        rows = summary.rows,
        skipped = summary.without_doi + summary.failed,
        output = %output.display(),
        "Saved author entries"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrossrefAffiliation, CrossrefAuthor};

    #[test]
    fn test_doi_from_doi_org() {
        assert_eq!(
            doi_from_url("https://doi.org/10.1145/3597503.3639187").as_deref(),
            Some("10.1145/3597503.3639187")
        );
        assert_eq!(doi_from_url(" http://doi.org/10.1/x ").as_deref(), Some("10.1/x"));
    }

    #[test]
    fn test_other_hosts_have_no_doi() {
        assert_eq!(doi_from_url("https://dl.acm.org/doi/10.1145/3597503.3639187"), None);
        assert_eq!(doi_from_url("https://www.doi.org.evil.com/10.1/x"), None);
        assert_eq!(doi_from_url("https://doi.org/"), None);
        assert_eq!(doi_from_url("not a url"), None);
        assert_eq!(doi_from_url(""), None);
    }

    #[test]
    fn test_author_rows_flatten() {
        let reference = PaperReference {
            reviewer: "DW".into(),
            title: "Paper".into(),
            authors: "A, B".into(),
            url: "https://doi.org/10.1/x".into(),
            ..Default::default()
        };
        let work = Work {
            doi: Some("10.1/x".into()),
            author: vec![
                CrossrefAuthor {
                    given: Some("Ada".into()),
                    family: Some("Byron".into()),
                    affiliation: vec![
                        CrossrefAffiliation { name: Some("Uni A".into()) },
                        CrossrefAffiliation { name: Some("Lab B".into()) },
                    ],
                },
                CrossrefAuthor { family: Some("Babbage".into()), ..Default::default() },
            ],
        };

        let rows = author_rows(&reference, &work);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].extracted_author, "Ada Byron");
        assert_eq!(rows[0].affiliations, "Uni A; Lab B");
        assert_eq!(rows[0].reviewer, "DW");
        assert_eq!(rows[0].original_authors, "A, B");
        assert_eq!(rows[1].extracted_author, "Babbage");
        assert_eq!(rows[1].affiliations, "");
    }

    #[test]
    fn test_work_without_authors_yields_no_rows() {
        assert!(author_rows(&PaperReference::default(), &Work::default()).is_empty());
    }
}
