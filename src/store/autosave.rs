//! Debounced autosave

use std::time::{Duration, Instant};

use super::{BoxId, GridStore, StoreResult};
use crate::grid::Grid;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);
const SAVED_DISPLAY: Duration = Duration::from_secs(2);
const ERROR_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Pending,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Pending => "modified",
            Self::Saving => "saving...",
            Self::Saved => "saved",
            Self::Error => "save failed",
        }
    }
}

/// Saves the grid once it has been left alone for `delay`.
///
/// The first save inserts a new box and later saves update it. Failures are
/// reported through the status and not retried until the next change.
#[derive(Debug)]
pub struct Autosave {
    delay: Duration,
    dirty_since: Option<Instant>,
    box_id: Option<BoxId>,
    status: SaveStatus,
    status_since: Instant,
    last_error: Option<String>,
}

impl Autosave {
    pub fn new(delay: Duration, box_id: Option<BoxId>, now: Instant) -> Self {
        Self {
            delay,
            dirty_since: None,
            box_id,
            status: SaveStatus::Idle,
            status_since: now,
            last_error: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn box_id(&self) -> Option<BoxId> {
        self.box_id
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    fn set_status(&mut self, status: SaveStatus, now: Instant) {
        self.status = status;
        self.status_since = now;
    }

    /// Restart the debounce window
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
        self.set_status(SaveStatus::Pending, now);
    }

    /// Drive the debounce and status expiry. Called every tick.
    pub fn poll(&mut self, now: Instant, store: &mut dyn GridStore, grid: &Grid) {
        match self.status {
            SaveStatus::Saved if now.duration_since(self.status_since) >= SAVED_DISPLAY => {
                self.set_status(SaveStatus::Idle, now);
            }
            SaveStatus::Error if now.duration_since(self.status_since) >= ERROR_DISPLAY => {
                self.set_status(SaveStatus::Idle, now);
            }
            _ => {}
        }

        if let Some(since) = self.dirty_since {
            if now.duration_since(since) >= self.delay {
                // Failure is already recorded in the status
                let _ = self.flush(now, store, grid);
            }
        }
    }

    /// Save immediately, regardless of the debounce window
    pub fn flush(&mut self, now: Instant, store: &mut dyn GridStore, grid: &Grid) -> StoreResult<BoxId> {
        self.dirty_since = None;
        self.set_status(SaveStatus::Saving, now);

        let result = match self.box_id {
            Some(id) => store.update(id, grid).map(|()| id),
            None => store.save(grid),
        };

        match &result {
            Ok(id) => {
                self.box_id = Some(*id);
                self.last_error = None;
                self.set_status(SaveStatus::Saved, now);
            }
            Err(e) => {
                tracing::warn!(error = %e, box_id = ?self.box_id, "autosave failed");
                self.last_error = Some(e.to_string());
                self.set_status(SaveStatus::Error, now);
            }
        }

        result
    }
}
