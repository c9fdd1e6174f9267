//! JSON file store

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoxId, GridStore, SavedGrid, StoreError, StoreResult};
use crate::grid::Grid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    boxes: Vec<StoredBox>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBox {
    id: BoxId,
    data: Grid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Every saved box version in a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> StoreResult<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Document::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl GridStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<SavedGrid>> {
        let document = self.read_document()?;
        let Some(latest) = document.boxes.into_iter().max_by_key(|b| b.id) else {
            return Ok(None);
        };

        let mut grid = latest.data;
        if grid.normalize() {
            tracing::warn!(id = latest.id, "stored box had an invalid shape and was repaired");
        }

        tracing::info!(id = latest.id, path = %self.path.display(), "box loaded");
        Ok(Some(SavedGrid {
            id: latest.id,
            grid,
            updated_at: latest.updated_at,
        }))
    }

    fn save(&mut self, grid: &Grid) -> StoreResult<BoxId> {
        let mut document = self.read_document()?;
        let id = document.boxes.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let now = Utc::now();

        document.boxes.push(StoredBox {
            id,
            data: grid.clone(),
            created_at: now,
            updated_at: now,
        });
        self.write_document(&document)?;

        tracing::info!(id, "box created");
        Ok(id)
    }

    fn update(&mut self, id: BoxId, grid: &Grid) -> StoreResult<()> {
        let mut document = self.read_document()?;
        let stored = document
            .boxes
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;

        stored.data = grid.clone();
        stored.updated_at = Utc::now();
        self.write_document(&document)?;

        tracing::debug!(id, "box updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellRef;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("boxes.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("boxes.json"));

        let mut grid = Grid::new();
        grid.set_text(CellRef::Problem, "Cheaper commute");
        grid.set_text(CellRef::Cell { row: 0, col: 0 }, "Bike");

        let id = store.save(&grid).unwrap();
        assert_eq!(id, 1);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.id, 1);
        assert_eq!(loaded.grid, grid);
        assert!(!dir.path().join("nested").join("boxes.json.tmp").exists());
    }

    #[test]
    fn test_load_returns_latest_id() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("boxes.json"));

        let first = Grid::new();
        let mut second = Grid::new();
        second.append_column("Third");

        store.save(&first).unwrap();
        let id = store.save(&second).unwrap();
        assert_eq!(id, 2);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.id, 2);
        assert_eq!(loaded.grid.column_count(), 3);
    }

    #[test]
    fn test_update_in_place() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("boxes.json"));

        let mut grid = Grid::new();
        let id = store.save(&grid).unwrap();
        grid.set_text(CellRef::Header(0), "Energy");
        store.update(id, &grid).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.grid.columns()[0], "Energy");
    }

    #[test]
    fn test_update_unknown_id() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("boxes.json"));
        let err = store.update(7, &Grid::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(7)));
    }

    #[test]
    fn test_load_repairs_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        fs::write(
            &path,
            r#"{"boxes":[{"id":3,"data":{"columns":["A","B"],"rows":[["x"]]},
            "createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}]}"#,
        )
        .unwrap();

        let loaded = JsonFileStore::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.grid.problem(), "");
        assert!(loaded.grid.is_shape_valid());
        assert_eq!(loaded.grid.rows()[0], vec!["x".to_string(), String::new()]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
