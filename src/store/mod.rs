//! Store Module
//!
//! Persistence of Zwicky boxes. The editor only sees the [`GridStore`]
//! trait; [`JsonFileStore`] keeps every saved version in one JSON document.

pub mod autosave;
pub mod file;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::grid::Grid;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Box not found: {0}")]
    NotFound(BoxId),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Identifier of a saved box version
pub type BoxId = i64;

/// Latest saved box as returned by [`GridStore::load`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGrid {
    pub id: BoxId,
    pub grid: Grid,
    pub updated_at: DateTime<Utc>,
}

pub trait GridStore {
    /// Most recently created box, if any
    fn load(&self) -> StoreResult<Option<SavedGrid>>;

    /// Insert a new box and return its id
    fn save(&mut self, grid: &Grid) -> StoreResult<BoxId>;

    /// Overwrite an existing box
    fn update(&mut self, id: BoxId, grid: &Grid) -> StoreResult<()>;
}

// Re-exports
pub use autosave::{Autosave, SaveStatus};
pub use file::JsonFileStore;
