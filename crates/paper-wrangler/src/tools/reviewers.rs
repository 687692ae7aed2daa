//! Even, positional assignment of selected papers to reviewers.

use std::path::Path;

use crate::error::{ToolError, ToolResult};
use crate::formatters::csv::{read_rows, write_rows};
use crate::models::{AssignedPaper, ReviewCandidate};

/// Split a comma-separated initials argument, e.g. `"DW, AA,JP"`.
///
/// Blank entries are dropped; at least one reviewer must remain.
pub fn parse_reviewers(initials: &str) -> ToolResult<Vec<String>> {
    let reviewers: Vec<String> = initials
        .split(',')
        .map(str::trim)
        .filter(|initial| !initial.is_empty())
        .map(str::to_string)
        .collect();

    if reviewers.is_empty() {
        return Err(ToolError::validation("reviewers", "at least one reviewer is required"));
    }
    Ok(reviewers)
}

/// `ceil(papers / reviewers)`; zero when there are no papers.
pub(crate) fn chunk_size(papers: usize, reviewers: usize) -> usize {
    papers.div_ceil(reviewers)
}

/// Reviewer slot for the paper at `index`: `min(index / chunk, reviewers - 1)`.
pub(crate) fn reviewer_index(index: usize, chunk: usize, reviewers: usize) -> usize {
    (index / chunk).min(reviewers - 1)
}

/// Assign each item to a reviewer slot in contiguous blocks of `ceil(items / reviewers)`.
///
/// Every reviewer but possibly the last gets exactly one block. With more
/// reviewers than items the trailing reviewers get nothing.
pub fn partition<T>(items: Vec<T>, reviewers: usize) -> ToolResult<Vec<(usize, T)>> {
    if reviewers == 0 {
        return Err(ToolError::validation("reviewers", "at least one reviewer is required"));
    }

    let chunk = chunk_size(items.len(), reviewers);
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (reviewer_index(index, chunk, reviewers), item))
        .collect())
}

/// Number of items per reviewer slot.
#[must_use]
pub fn reviewer_loads<T>(assignments: &[(usize, T)], reviewers: usize) -> Vec<usize> {
    let mut loads = vec![0; reviewers];
    for (slot, _) in assignments {
        loads[*slot] += 1;
    }
    loads
}

/// Outcome of an assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSummary {
    /// Rows selected by the marker column.
    pub selected: usize,
    /// Papers per reviewer, in the order the reviewers were given.
    pub loads: Vec<(String, usize)>,
    /// Whether an output file was written.
    pub written: bool,
}

/// Assign the selected rows of `input` to `reviewers` and write `output`.
///
/// Nothing is written when no row is selected.
pub fn assign_reviewers(
    input: &Path,
    output: &Path,
    reviewers: &[String],
) -> ToolResult<AssignmentSummary> {
    let candidates: Vec<ReviewCandidate> = read_rows(input)?;
    let selected: Vec<ReviewCandidate> =
        candidates.into_iter().filter(ReviewCandidate::is_selected).collect();

    let assignments = partition(selected, reviewers.len())?;
    let loads = reviewer_loads(&assignments, reviewers.len());
    let summary = AssignmentSummary {
        selected: assignments.len(),
        loads: reviewers.iter().cloned().zip(loads).collect(),
        written: !assignments.is_empty(),
    };

    if assignments.is_empty() {
        tracing::warn!(input = %input.display(), "No papers selected (ai=true), nothing assigned");
        return Ok(summary);
    }

    let rows = assignments
        .into_iter()
        .map(|(slot, candidate)| candidate.assign(&reviewers[slot]));
    write_rows(output, AssignedPaper::COLUMNS, rows)?;

    tracing::info!(
        papers = summary.selected,
        reviewers = reviewers.len(),
        output = %output.display(),
        "Assigned papers"
    );
    for (reviewer, load) in &summary.loads {
        tracing::info!(reviewer = %reviewer, papers = load, "Reviewer load");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_ten_papers_three_reviewers() {
        assert_eq!(chunk_size(10, 3), 4);

        let assignments = partition((0..10).collect::<Vec<usize>>(), 3).unwrap();
        let slots: Vec<usize> = assignments.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
        assert_eq!(reviewer_loads(&assignments, 3), vec![4, 4, 2]);
    }

    #[test]
    fn test_no_papers() {
        let assignments = partition(Vec::<u8>::new(), 3).unwrap();
        assert!(assignments.is_empty());
        assert_eq!(reviewer_loads(&assignments, 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_more_reviewers_than_papers() {
        let assignments = partition(vec!['a', 'b'], 5).unwrap();
        assert_eq!(reviewer_loads(&assignments, 5), vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_uneven_tail_goes_to_last_blocks() {
        // chunk = ceil(10 / 4) = 3 -> 3, 3, 3, 1
        let assignments = partition((0..10).collect::<Vec<usize>>(), 4).unwrap();
        assert_eq!(reviewer_loads(&assignments, 4), vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_zero_reviewers_is_error() {
        let err = partition(vec![1, 2, 3], 0).unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn test_parse_reviewers() {
        assert_eq!(parse_reviewers("DW, AA,JP,FS").unwrap(), reviewers(&["DW", "AA", "JP", "FS"]));
        assert_eq!(parse_reviewers("DW,,AA").unwrap(), reviewers(&["DW", "AA"]));
        assert!(parse_reviewers(" , ").is_err());
    }
}
