//! Search over the problem statement, headers and cells.

use crate::grid::{Grid, HEADER_ROW, PROBLEM_ROW};

use super::Selection;

/// Query, ordered matches and the index of the current match
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    matches: Vec<Selection>,
    current: usize,
}

/// Case-insensitive substring matches in scan order: problem, headers,
/// then data cells row by row.
pub fn find_matches(grid: &Grid, query: &str) -> Vec<Selection> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let mut matches = Vec::new();

    if hit(grid.problem()) {
        matches.push(Selection::new(PROBLEM_ROW, 0));
    }

    for (col, name) in grid.columns().iter().enumerate() {
        if hit(name) {
            matches.push(Selection::new(HEADER_ROW, col));
        }
    }

    for (row, cells) in grid.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if hit(cell) {
                matches.push(Selection::new(row as isize, col));
            }
        }
    }

    matches
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the search for `query`.
    ///
    /// Returns the first match when there is one, which resets the current
    /// index to 0.
    pub fn update(&mut self, query: &str, grid: &Grid) -> Option<Selection> {
        self.query = query.to_string();
        self.matches = find_matches(grid, query);
        let first = self.matches.first().copied()?;
        self.current = 0;
        Some(first)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = 0;
    }

    /// Step forward circularly
    pub fn next(&mut self) -> Option<Selection> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        Some(self.matches[self.current])
    }

    /// Step backward circularly
    pub fn prev(&mut self) -> Option<Selection> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = match self.current {
            0 => self.matches.len() - 1,
            i => i - 1,
        };
        Some(self.matches[self.current])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Selection] {
        &self.matches
    }

    pub fn is_match(&self, selection: Selection) -> bool {
        self.matches.contains(&selection)
    }

    /// 1-based position and total, for the status line
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.matches.is_empty() {
            return None;
        }
        Some((self.current + 1, self.matches.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_parts(
            "find me",
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec!["x".to_string(), "find".to_string()],
                vec!["y".to_string(), "z".to_string()],
            ],
        )
    }

    #[test]
    fn test_scan_order() {
        let matches = find_matches(&sample(), "find");
        assert_eq!(matches, vec![Selection::new(-2, 0), Selection::new(0, 1)]);
    }

    #[test]
    fn test_case_insensitive() {
        let matches = find_matches(&sample(), "FIND");
        assert_eq!(matches.len(), 2);
        let headers = find_matches(&sample(), "b");
        assert_eq!(headers, vec![Selection::new(-1, 1)]);
    }

    #[test]
    fn test_empty_query_has_no_matches() {
        let mut state = SearchState::new();
        assert_eq!(state.update("", &sample()), None);
        assert!(state.matches().is_empty());
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut state = SearchState::new();
        let grid = sample();
        assert_eq!(state.update("find", &grid), Some(Selection::new(-2, 0)));

        assert_eq!(state.next(), Some(Selection::new(0, 1)));
        assert_eq!(state.next(), Some(Selection::new(-2, 0)));
        assert_eq!(state.prev(), Some(Selection::new(0, 1)));
        assert_eq!(state.position(), Some((2, 2)));
    }

    #[test]
    fn test_no_matches_keeps_index() {
        let mut state = SearchState::new();
        let grid = sample();
        state.update("find", &grid);
        state.next();
        assert_eq!(state.update("nothing", &grid), None);
        assert_eq!(state.next(), None);
        assert_eq!(state.prev(), None);
    }
}
