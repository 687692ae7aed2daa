//! Bibliography to CSV conversion, with or without artifact badges.

use std::path::Path;

use crate::artifacts::{ArtifactFiles, ArtifactTitles};
use crate::bibtex;
use crate::error::{ToolError, ToolResult};
use crate::formatters::csv::write_rows;
use crate::models::{ArtifactPaperRow, Paper, PaperRow};

/// Outcome of a conversion with artifact badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Papers written.
    pub papers: usize,
    /// Papers holding at least one badge.
    pub badged: usize,
    /// Titles in the "available" bibliography.
    pub available: usize,
    /// Titles in the "reusable" bibliography.
    pub reusable: usize,
    /// Titles in the "functional" bibliography.
    pub functional: usize,
}

fn read_bibliography(path: &Path) -> ToolResult<Vec<Paper>> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    Ok(bibtex::parse_bibliography(&text))
}

/// Convert one bibliography to `title,authors,url,abstract` CSV.
///
/// Returns the papers that were written.
pub fn convert_bibliography(input: &Path, output: &Path) -> ToolResult<Vec<Paper>> {
    let papers = read_bibliography(input)?;
    write_rows(output, PaperRow::COLUMNS, papers.iter().map(Paper::as_row))?;

    tracing::info!(
        papers = papers.len(),
        input = %input.display(),
        output = %output.display(),
        "Converted bibliography"
    );
    Ok(papers)
}

/// Convert a conference year's main bibliography, flagging artifact badges.
///
/// The main bibliography must exist; missing artifact bibliographies leave
/// the corresponding badge false for every paper.
pub fn convert_with_artifacts(files: &ArtifactFiles, output: &Path) -> ToolResult<ArtifactReport> {
    let papers = read_bibliography(&files.primary)?;
    let titles = ArtifactTitles::load(files)?;
    let papers = titles.annotate(papers);

    write_rows(output, ArtifactPaperRow::COLUMNS, papers.iter().map(Paper::as_artifact_row))?;

    let report = ArtifactReport {
        papers: papers.len(),
        badged: papers.iter().filter(|paper| paper.artifacts.any()).count(),
        available: titles.available.len(),
        reusable: titles.reusable.len(),
        functional: titles.functional.len(),
    };
    tracing::info!(
        papers = report.papers,
        badged = report.badged,
        available = report.available,
        reusable = report.reusable,
        functional = report.functional,
        output = %output.display(),
        "Converted bibliography with artifact badges"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_bibliography(&dir.path().join("none.bib"), &dir.path().join("o.csv"))
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingInput { .. }));
        assert!(!dir.path().join("o.csv").exists());
    }

    #[test]
    fn test_missing_primary_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let files = ArtifactFiles::for_year(dir.path(), "2023", "ICSE");
        let err = convert_with_artifacts(&files, &dir.path().join("o.csv")).unwrap_err();
        assert!(matches!(err, ToolError::MissingInput { .. }));
    }
}
