//! Crossref `works` payloads (only the fields the affiliation fetcher reads).

use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /works/{doi}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkResponse {
    /// The work itself.
    pub message: Work,
}

/// A registered work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    /// DOI of the work.
    #[serde(default, rename = "DOI")]
    pub doi: Option<String>,

    /// Authors in byline order.
    #[serde(default)]
    pub author: Vec<CrossrefAuthor>,
}

/// An author entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefAuthor {
    #[serde(default)]
    pub given: Option<String>,

    #[serde(default)]
    pub family: Option<String>,

    #[serde(default)]
    pub affiliation: Vec<CrossrefAffiliation>,
}

/// An affiliation entry; Crossref sometimes sends objects without `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossrefAffiliation {
    #[serde(default)]
    pub name: Option<String>,
}

impl CrossrefAuthor {
    /// Given and family names joined by a space, empty parts omitted.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.given.as_deref(), self.family.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Affiliation names joined with `"; "`, or empty if there are none.
    #[must_use]
    pub fn affiliation_names(&self) -> String {
        self.affiliation
            .iter()
            .filter_map(|aff| aff.name.as_deref())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
