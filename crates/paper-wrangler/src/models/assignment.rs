//! Rows read and written by the reviewer assigner.

use serde::{Deserialize, Serialize};

use super::{is_truthy, lenient_bool};

/// A row of a converted bibliography, after a human has added the `ai` marker column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewCandidate {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub authors: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub r#abstract: String,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub artifact_available: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub artifact_reusable: bool,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub artifact_functional: bool,

    /// Marker column; only rows holding `true` are assigned.
    #[serde(default)]
    pub ai: String,
}

impl ReviewCandidate {
    /// Whether the marker column selects this row for review.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        is_truthy(&self.ai)
    }

    /// Attach a reviewer, leaving the relevance verdict empty.
    #[must_use]
    pub fn assign(self, reviewer: &str) -> AssignedPaper {
        AssignedPaper {
            reviewer: reviewer.to_string(),
            relevant: String::new(),
            title: self.title,
            authors: self.authors,
            url: self.url,
            r#abstract: self.r#abstract,
            artifact_available: self.artifact_available,
            artifact_reusable: self.artifact_reusable,
            artifact_functional: self.artifact_functional,
            ai: self.ai,
        }
    }
}

/// A paper with its reviewer. `relevant` is filled in by the reviewer later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPaper {
    pub reviewer: String,
    pub relevant: String,
    pub title: String,
    pub authors: String,
    pub url: String,
    pub r#abstract: String,
    pub artifact_available: bool,
    pub artifact_reusable: bool,
    pub artifact_functional: bool,
    pub ai: String,
}

impl AssignedPaper {
    pub const COLUMNS: &'static [&'static str] = &[
        "reviewer",
        "relevant",
        "title",
        "authors",
        "url",
        "abstract",
        "artifact_available",
        "artifact_reusable",
        "artifact_functional",
        "ai",
    ];
}
