//! Record types flowing through the pipelines.
//!
//! Every CSV row type is a plain struct with named, typed fields. Columns
//! missing from an input file fall back to `#[serde(default)]`.

mod affiliation;
mod assignment;
mod chat;
mod crossref;
mod enums;
mod paper;
mod scraped;

pub use affiliation::{AffiliationRow, CountryRow, PaperReference};
pub use assignment::{AssignedPaper, ReviewCandidate};
pub use chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};
pub use crossref::{CrossrefAffiliation, CrossrefAuthor, Work, WorkResponse};
pub use enums::OutputFormat;
pub use paper::{ArtifactFlags, ArtifactPaperRow, Paper, PaperRow};
pub use scraped::ScrapedEntry;

use serde::{Deserialize, Deserializer};

/// Read a spreadsheet-style boolean: case-insensitive `true` is true, anything else false.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.is_some_and(|value| is_truthy(&value)))
}

/// Whether a cell holds the literal `true`, ignoring case and surrounding space.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
