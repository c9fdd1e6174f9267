//! Read-only projections of analysis results onto the grid

use super::{Evaluation, Verdict, VerdictSummary};
use crate::grid::Grid;

fn involves(evaluation: &Evaluation, column: &str, value: &str) -> bool {
    evaluation.combination.get(column).is_some_and(|v| v == value)
}

/// Evaluations whose combination uses the value of cell (`row`, `col`)
pub fn evaluations_for_cell<'a>(
    grid: &Grid,
    results: &'a [Evaluation],
    row: usize,
    col: usize,
) -> Vec<&'a Evaluation> {
    let (Some(column), Some(value)) = (grid.columns().get(col), grid.cell(row, col)) else {
        return Vec::new();
    };
    if value.is_empty() {
        return Vec::new();
    }
    results.iter().filter(|e| involves(e, column, value)).collect()
}

/// Representative evaluation for a cell.
///
/// A promising evaluation wins over a yes, which wins over whichever
/// evaluation came first.
pub fn cell_verdict<'a>(grid: &Grid, results: &'a [Evaluation], row: usize, col: usize) -> Option<&'a Evaluation> {
    let matching = evaluations_for_cell(grid, results, row, col);
    matching
        .iter()
        .find(|e| e.verdict == Verdict::Promising)
        .or_else(|| matching.iter().find(|e| e.verdict == Verdict::Yes))
        .or_else(|| matching.first())
        .copied()
}

/// Paths ending in a row: evaluations using the row's last-column value
pub fn row_paths<'a>(grid: &Grid, results: &'a [Evaluation], row: usize) -> Vec<&'a Evaluation> {
    evaluations_for_cell(grid, results, row, grid.column_count() - 1)
}

pub fn tally<'a>(results: impl IntoIterator<Item = &'a Evaluation>) -> VerdictSummary {
    let mut summary = VerdictSummary::default();
    for evaluation in results {
        summary.add(evaluation.verdict);
    }
    summary
}

/// Per-verdict path counts for a row
pub fn row_summary(grid: &Grid, results: &[Evaluation], row: usize) -> VerdictSummary {
    tally(row_paths(grid, results, row))
}

/// Stepping through the paths of one row that share a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathView {
    paths: Vec<Evaluation>,
    index: usize,
}

impl PathView {
    /// Open the row's paths with `verdict`, or `None` if it has none
    pub fn open(grid: &Grid, results: &[Evaluation], row: usize, verdict: Verdict) -> Option<Self> {
        let paths: Vec<Evaluation> = row_paths(grid, results, row)
            .into_iter()
            .filter(|e| e.verdict == verdict)
            .cloned()
            .collect();

        if paths.is_empty() {
            return None;
        }
        Some(Self { paths, index: 0 })
    }

    pub fn current(&self) -> &Evaluation {
        &self.paths[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1).min(self.paths.len() - 1);
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Whether cell (`row`, `col`) is part of the highlighted path
    pub fn highlights(&self, grid: &Grid, row: usize, col: usize) -> bool {
        match (grid.columns().get(col), grid.cell(row, col)) {
            (Some(column), Some(value)) => involves(self.current(), column, value),
            _ => false,
        }
    }
}
