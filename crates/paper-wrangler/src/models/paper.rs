//! Paper records extracted from bibliographies.

use serde::{Deserialize, Serialize};

/// Presence of a paper in each artifact-evaluation bibliography.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFlags {
    /// Listed in the "Artifact Available" bibliography.
    pub available: bool,
    /// Listed in the "Artifact Reusable" bibliography.
    pub reusable: bool,
    /// Listed in the "Artifact Functional" bibliography.
    pub functional: bool,
}

impl ArtifactFlags {
    /// Flags as a `(available, reusable, functional)` tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (bool, bool, bool) {
        (self.available, self.reusable, self.functional)
    }

    /// True if any badge was awarded.
    #[must_use]
    pub const fn any(self) -> bool {
        self.available || self.reusable || self.functional
    }
}

/// A paper extracted from one bibliography entry.
///
/// A paper always has a non-empty title; the other text fields are empty
/// strings when the entry did not carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paper {
    /// Whitespace-collapsed title. Also the join key across bibliographies.
    pub title: String,

    /// Authors joined with `", "`.
    pub authors: String,

    /// Reference URL (usually a `doi.org` link).
    pub url: String,

    /// Abstract text.
    pub r#abstract: String,

    /// Artifact badges, all false until joined.
    pub artifacts: ArtifactFlags,
}

impl Paper {
    /// Row for the plain `title,authors,url,abstract` export.
    #[must_use]
    pub fn as_row(&self) -> PaperRow<'_> {
        PaperRow {
            title: &self.title,
            authors: &self.authors,
            url: &self.url,
            r#abstract: &self.r#abstract,
        }
    }

    /// Row for the export that carries artifact badges.
    #[must_use]
    pub fn as_artifact_row(&self) -> ArtifactPaperRow<'_> {
        ArtifactPaperRow {
            title: &self.title,
            authors: &self.authors,
            url: &self.url,
            r#abstract: &self.r#abstract,
            artifact_available: self.artifacts.available,
            artifact_reusable: self.artifacts.reusable,
            artifact_functional: self.artifacts.functional,
        }
    }
}

/// CSV row: `title,authors,url,abstract`.
#[derive(Debug, Serialize)]
pub struct PaperRow<'a> {
    pub title: &'a str,
    pub authors: &'a str,
    pub url: &'a str,
    pub r#abstract: &'a str,
}

impl PaperRow<'_> {
    pub const COLUMNS: &'static [&'static str] = &["title", "authors", "url", "abstract"];
}

/// CSV row: the plain columns followed by the three artifact badges.
#[derive(Debug, Serialize)]
pub struct ArtifactPaperRow<'a> {
    pub title: &'a str,
    pub authors: &'a str,
    pub url: &'a str,
    pub r#abstract: &'a str,
    pub artifact_available: bool,
    pub artifact_reusable: bool,
    pub artifact_functional: bool,
}

impl ArtifactPaperRow<'_> {
    pub const COLUMNS: &'static [&'static str] = &[
        "title",
        "authors",
        "url",
        "abstract",
        "artifact_available",
        "artifact_reusable",
        "artifact_functional",
    ];
}
