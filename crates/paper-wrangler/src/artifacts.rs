//! Artifact-badge join across bibliographies.
//!
//! Each artifact-evaluation category ships as its own bibliography. A paper
//! earns a badge when a paper with the identical normalized title appears in
//! that category's file. Titles are compared exactly (case and punctuation
//! included) after whitespace collapsing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::bibtex;
use crate::error::{ToolError, ToolResult};
use crate::models::{ArtifactFlags, Paper};

/// Title sets of the three artifact bibliographies.
#[derive(Debug, Clone, Default)]
pub struct ArtifactTitles {
    pub available: HashSet<String>,
    pub reusable: HashSet<String>,
    pub functional: HashSet<String>,
}

impl ArtifactTitles {
    /// Build from the three bibliography texts.
    #[must_use]
    pub fn from_texts(available: &str, reusable: &str, functional: &str) -> Self {
        Self {
            available: bibtex::extract_titles(available),
            reusable: bibtex::extract_titles(reusable),
            functional: bibtex::extract_titles(functional),
        }
    }

    /// Load the three bibliographies. A missing file contributes no titles.
    pub fn load(files: &ArtifactFiles) -> ToolResult<Self> {
        Ok(Self {
            available: titles_from_file(&files.available)?,
            reusable: titles_from_file(&files.reusable)?,
            functional: titles_from_file(&files.functional)?,
        })
    }

    /// Badges for a single title.
    #[must_use]
    pub fn flags_for(&self, title: &str) -> ArtifactFlags {
        ArtifactFlags {
            available: self.available.contains(title),
            reusable: self.reusable.contains(title),
            functional: self.functional.contains(title),
        }
    }

    /// Return the papers with their badges set.
    #[must_use]
    pub fn annotate(&self, papers: Vec<Paper>) -> Vec<Paper> {
        papers
            .into_iter()
            .map(|paper| Paper { artifacts: self.flags_for(&paper.title), ..paper })
            .collect()
    }
}

/// Locations of a conference year's bibliographies.
///
/// Layout: `<data_dir>/<year>/<year><venue>.bib` plus
/// `<year><venue>_Artifact_{Available,Reusable,Functional}.bib` next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub primary: PathBuf,
    pub available: PathBuf,
    pub reusable: PathBuf,
    pub functional: PathBuf,
}

impl ArtifactFiles {
    #[must_use]
    pub fn for_year(data_dir: &Path, year: &str, venue: &str) -> Self {
        let dir = data_dir.join(year);
        let prefix = format!("{year}{venue}");
        Self {
            primary: dir.join(format!("{prefix}.bib")),
            available: dir.join(format!("{prefix}_Artifact_Available.bib")),
            reusable: dir.join(format!("{prefix}_Artifact_Reusable.bib")),
            functional: dir.join(format!("{prefix}_Artifact_Functional.bib")),
        }
    }
}

/// Titles of one auxiliary bibliography; an absent file yields an empty set.
pub fn titles_from_file(path: &Path) -> ToolResult<HashSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(bibtex::extract_titles(&text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Artifact bibliography absent, no badges");
            Ok(HashSet::new())
        }
        Err(err) => Err(ToolError::io(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str) -> Paper {
        Paper { title: title.to_string(), ..Default::default() }
    }

    #[test]
    fn test_available_only() {
        let titles = ArtifactTitles::from_texts("@misc{a,\ntitle = {Paper A}}", "", "");
        let flags = titles.flags_for("Paper A");
        assert_eq!(flags.as_tuple(), (true, false, false));
    }

    #[test]
    fn test_absent_everywhere() {
        let titles = ArtifactTitles::from_texts(
            "@misc{a,\ntitle = {Paper A}}",
            "@misc{a,\ntitle = {Paper A}}",
            "@misc{a,\ntitle = {Paper A}}",
        );
        assert_eq!(titles.flags_for("Paper B").as_tuple(), (false, false, false));
    }

    #[test]
    fn test_join_uses_whitespace_normalized_titles() {
        let titles =
            ArtifactTitles::from_texts("", "@misc{a,\ntitle = {Paper\n    A}}", "");
        let papers = titles.annotate(vec![paper("Paper A"), paper("paper a")]);
        assert!(papers[0].artifacts.reusable);
        assert!(!papers[1].artifacts.reusable, "case differences do not match");
    }

    #[test]
    fn test_for_year_layout() {
        let files = ArtifactFiles::for_year(Path::new("data"), "2024", "ICSE");
        assert_eq!(files.primary, Path::new("data/2024/2024ICSE.bib"));
        assert_eq!(
            files.functional,
            Path::new("data/2024/2024ICSE_Artifact_Functional.bib")
        );
    }

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let titles = titles_from_file(&dir.path().join("absent.bib")).unwrap();
        assert!(titles.is_empty());
    }
}
