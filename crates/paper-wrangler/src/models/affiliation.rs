//! Rows of the per-author affiliation table.

use serde::{Deserialize, Serialize};

/// The columns of an input row the affiliation fetcher needs.
///
/// Usually an assigned-papers file; `reviewer` and `relevant` are empty
/// when the input is a plain converted bibliography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaperReference {
    #[serde(default)]
    pub reviewer: String,
    #[serde(default)]
    pub relevant: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub url: String,
}

/// One `(paper, author)` pair with the author's affiliations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationRow {
    pub reviewer: String,
    pub relevant: String,
    pub title: String,
    /// Author list as it appeared in the bibliography.
    pub original_authors: String,
    pub url: String,
    /// Author name as returned by the metadata service.
    pub extracted_author: String,
    /// Affiliation names joined with `"; "`.
    pub affiliations: String,
}

impl AffiliationRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "reviewer",
        "relevant",
        "title",
        "original_authors",
        "url",
        "extracted_author",
        "affiliations",
    ];
}

/// The columns of an affiliation row the country step reads.
///
/// Other columns of the file are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryRow {
    /// Affiliation names joined with `"; "`.
    #[serde(default)]
    pub affiliations: String,
    /// Empty until the country has been inferred.
    #[serde(default)]
    pub country: String,
}

impl CountryRow {
    /// Whether this row still needs a country.
    ///
    /// With `retry_errors`, rows holding the failure sentinel count as missing too.
    #[must_use]
    pub fn needs_country(&self, retry_errors: bool) -> bool {
        let country = self.country.trim();
        country.is_empty() || (retry_errors && country == crate::tools::countries::ERROR_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_country() {
        let mut row = CountryRow::default();
        assert!(row.needs_country(false));

        row.country = "  ".into();
        assert!(row.needs_country(false));

        row.country = "Error".into();
        assert!(!row.needs_country(false));
        assert!(row.needs_country(true));

        row.country = "Germany".into();
        assert!(!row.needs_country(true));
    }
}
