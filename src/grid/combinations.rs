//! Combination space of a grid.

use indexmap::IndexMap;

use super::Grid;

/// One value per column, keyed by column name in grid order
pub type Combination = IndexMap<String, String>;

impl Grid {
    /// Non-empty values of a column, top to bottom
    pub fn column_values(&self, col: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(col))
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect()
    }

    fn value_axes(&self) -> Vec<(&str, Vec<&str>)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), self.column_values(idx)))
            .filter(|(_, values)| !values.is_empty())
            .collect()
    }

    /// Number of combinations `combinations()` would produce
    pub fn combination_count(&self) -> usize {
        let axes = self.value_axes();
        if axes.is_empty() {
            return 0;
        }
        axes.iter().map(|(_, values)| values.len()).product()
    }

    /// Cartesian product over the non-empty values of every column.
    ///
    /// Columns without any value are skipped. The first column varies
    /// slowest.
    pub fn combinations(&self) -> Vec<Combination> {
        let axes = self.value_axes();
        if axes.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<Combination> = vec![Combination::new()];
        for (name, values) in &axes {
            let mut next = Vec::with_capacity(out.len() * values.len());
            for partial in &out {
                for value in values {
                    let mut combo = partial.clone();
                    combo.insert(name.to_string(), value.to_string());
                    next.push(combo);
                }
            }
            out = next;
        }
        out
    }
}
