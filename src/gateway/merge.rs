//! Merge accepted suggestions into the grid.
//!
//! Each function returns false when there was nothing to merge, so they can
//! be passed straight to `Editor::apply`.

use super::{SuggestedColumn, SuggestedValue};
use crate::grid::{CellRef, Grid};

/// Append a column, placing `suggested_values[i]` in row `i`.
///
/// Rows are appended while there are more values than rows.
pub fn accept_column(grid: &mut Grid, column: &SuggestedColumn) -> bool {
    grid.append_column(column.name.as_str());
    let col = grid.column_count() - 1;

    for (row, value) in column.suggested_values.iter().enumerate() {
        while grid.row_count() <= row {
            grid.append_row();
        }
        grid.set_text(CellRef::Cell { row, col }, value);
    }
    true
}

pub fn accept_columns(grid: &mut Grid, columns: &[SuggestedColumn]) -> bool {
    for column in columns {
        accept_column(grid, column);
    }
    !columns.is_empty()
}

/// Put `value` in the first blank cell of column `col`, or in a new row
pub fn accept_value(grid: &mut Grid, col: usize, value: &SuggestedValue) -> bool {
    if col >= grid.column_count() {
        return false;
    }

    let row = match grid.first_free_row(col) {
        Some(row) => row,
        None => {
            grid.append_row();
            grid.row_count() - 1
        }
    };
    grid.set_text(CellRef::Cell { row, col }, &value.value)
}

pub fn accept_values(grid: &mut Grid, col: usize, values: &[SuggestedValue]) -> bool {
    if col >= grid.column_count() || values.is_empty() {
        return false;
    }
    for value in values {
        accept_value(grid, col, value);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[&str]) -> SuggestedColumn {
        SuggestedColumn {
            name: name.to_string(),
            description: String::new(),
            suggested_values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn value(v: &str) -> SuggestedValue {
        SuggestedValue {
            value: v.to_string(),
            rationale: String::new(),
        }
    }

    #[test]
    fn test_accept_column_fills_rows() {
        let mut grid = Grid::new();
        accept_column(&mut grid, &column("Storage", &["Shed"]));

        assert_eq!(grid.columns()[2], "Storage");
        assert_eq!(grid.cell(0, 2), Some("Shed"));
        assert_eq!(grid.cell(1, 2), Some(""));
        assert!(grid.is_shape_valid());
    }

    #[test]
    fn test_accept_column_appends_rows() {
        let mut grid = Grid::new();
        accept_column(&mut grid, &column("Storage", &["Shed", "Rack", "Loft"]));

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.rows()[2], vec!["", "", "Loft"]);
        assert!(grid.is_shape_valid());
    }

    #[test]
    fn test_accept_columns_in_order() {
        let mut grid = Grid::new();
        assert!(!accept_columns(&mut grid, &[]));
        assert!(accept_columns(&mut grid, &[column("X", &["1"]), column("Y", &["2"])]));
        assert_eq!(&grid.columns()[2..], &["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn test_accept_value_fills_first_blank() {
        let mut grid = Grid::from_parts(
            "",
            vec!["A".to_string()],
            vec![vec!["taken".to_string()], vec!["  ".to_string()], vec![String::new()]],
        );

        assert!(accept_value(&mut grid, 0, &value("new")));
        assert_eq!(grid.cell(1, 0), Some("new"));
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn test_accept_value_appends_row_when_full() {
        let mut grid = Grid::from_parts(
            "",
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["a".to_string(), "b".to_string()]],
        );

        assert!(accept_values(&mut grid, 1, &[value("c"), value("d")]));
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.rows()[1], vec!["", "c"]);
        assert_eq!(grid.rows()[2], vec!["", "d"]);
    }

    #[test]
    fn test_accept_value_unknown_column() {
        let mut grid = Grid::new();
        assert!(!accept_value(&mut grid, 4, &value("x")));
        assert!(!accept_values(&mut grid, 0, &[]));
    }
}
