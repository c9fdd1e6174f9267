//! Grid Model
//!
//! Parameters (columns), candidate values (rows) and the problem statement
//! of a morphological analysis matrix.

pub mod combinations;

use serde::{Deserialize, Serialize};

pub use combinations::Combination;

/// Selection row index of the problem statement
pub const PROBLEM_ROW: isize = -2;
/// Selection row index of the column header row
pub const HEADER_ROW: isize = -1;

/// Addressable text slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRef {
    Problem,
    Header(usize),
    Cell { row: usize, col: usize },
}

/// Deep copy of the grid contents used by undo/redo.
///
/// The problem statement is not part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Zwicky box contents.
///
/// Invariants: at least one column, at least one row, and every row has
/// exactly `columns.len()` cells. Every mutation below keeps them; deletes
/// that would break the floor are refused and return `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(default)]
    problem: String,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            columns: vec!["Parameter 1".to_string(), "Parameter 2".to_string()],
            rows: vec![vec![String::new(); 2], vec![String::new(); 2]],
            problem: String::new(),
        }
    }
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from raw parts, repairing any shape violations
    pub fn from_parts(problem: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut grid = Self {
            columns,
            rows,
            problem: problem.into(),
        };
        grid.normalize();
        grid
    }

    /// Repair a grid that came from outside (store, gateway).
    ///
    /// Returns true if anything had to change.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.columns.is_empty() {
            self.columns.push("Parameter 1".to_string());
            changed = true;
        }
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
            changed = true;
        }

        let width = self.columns.len();
        for row in &mut self.rows {
            if row.len() != width {
                row.resize(width, String::new());
                changed = true;
            }
        }

        changed
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn text(&self, target: CellRef) -> Option<&str> {
        match target {
            CellRef::Problem => Some(&self.problem),
            CellRef::Header(col) => self.columns.get(col).map(String::as_str),
            CellRef::Cell { row, col } => self.cell(row, col),
        }
    }

    /// Overwrite the text at `target`. Returns false if it does not exist.
    pub fn set_text(&mut self, target: CellRef, value: &str) -> bool {
        let slot = match target {
            CellRef::Problem => Some(&mut self.problem),
            CellRef::Header(col) => self.columns.get_mut(col),
            CellRef::Cell { row, col } => self.rows.get_mut(row).and_then(|r| r.get_mut(col)),
        };

        match slot {
            Some(slot) => {
                slot.clear();
                slot.push_str(value);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, target: CellRef) -> bool {
        self.set_text(target, "")
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Install a snapshot, keeping the current problem statement
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.columns = snapshot.columns;
        self.rows = snapshot.rows;
        self.normalize();
    }

    fn empty_row(&self) -> Vec<String> {
        vec![String::new(); self.columns.len()]
    }

    /// Insert an empty row so that it ends up at index `at`
    pub fn insert_row(&mut self, at: usize) -> bool {
        if at > self.rows.len() {
            return false;
        }
        let row = self.empty_row();
        self.rows.insert(at, row);
        true
    }

    pub fn append_row(&mut self) {
        let row = self.empty_row();
        self.rows.push(row);
    }

    pub fn delete_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Default name for the next column: `Parameter {n+1}`
    pub fn next_column_name(&self) -> String {
        format!("Parameter {}", self.columns.len() + 1)
    }

    /// Insert a column at `at`, with an empty cell in every row
    pub fn insert_column(&mut self, at: usize, name: impl Into<String>) -> bool {
        if at > self.columns.len() {
            return false;
        }
        self.columns.insert(at, name.into());
        for row in &mut self.rows {
            row.insert(at, String::new());
        }
        true
    }

    pub fn append_column(&mut self, name: impl Into<String>) {
        let at = self.columns.len();
        self.insert_column(at, name);
    }

    pub fn delete_column(&mut self, index: usize) -> bool {
        if self.columns.len() <= 1 || index >= self.columns.len() {
            return false;
        }
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// First row whose cell in `col` is empty or whitespace
    pub fn first_free_row(&self, col: usize) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(col).is_some_and(|cell| cell.trim().is_empty()))
    }

    pub fn is_shape_valid(&self) -> bool {
        !self.columns.is_empty()
            && !self.rows.is_empty()
            && self.rows.iter().all(|r| r.len() == self.columns.len())
    }
}
