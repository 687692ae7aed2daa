//! Entries scraped from a conference program table.

use serde::{Deserialize, Serialize};

/// Title and author line of one program row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedEntry {
    pub title: String,
    pub authors: String,
}

impl ScrapedEntry {
    pub const COLUMNS: &'static [&'static str] = &["title", "authors"];
}
