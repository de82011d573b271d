//! Bounded linear undo log of encoded full-surface snapshots.
//!
//! `cursor` indexes the entry matching the surface. Taking a snapshot after
//! an undo drops every entry past the cursor. Once initialised the log
//! always holds at least one entry.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::CanvasError;
use crate::surface::RasterSurface;

/// Default number of retained snapshots.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug)]
pub struct HistoryStack {
    capacity: usize,
    entries: VecDeque<Arc<Vec<u8>>>,
    cursor: usize,
}

impl HistoryStack {
    /// Create a history seeded with the current state of `surface`.
    pub fn new(capacity: usize, surface: &RasterSurface) -> Result<Self, CanvasError> {
        let mut history = Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            cursor: 0,
        };
        history.snapshot(surface)?;
        Ok(history)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record the current surface as the newest entry.
    pub fn snapshot(&mut self, surface: &RasterSurface) -> Result<(), CanvasError> {
        let encoded = surface.encode_png()?;

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(Arc::new(encoded));
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;

        tracing::debug!(cursor = self.cursor, len = self.entries.len(), "Canvas snapshot taken");
        Ok(())
    }

    /// Step back one entry and restore it into `surface`.
    ///
    /// At the oldest entry this fails with [`CanvasError::NothingToUndo`]
    /// and leaves both the log and the surface untouched.
    pub async fn undo(&mut self, surface: &mut RasterSurface) -> Result<(), CanvasError> {
        if !self.can_undo() {
            return Err(CanvasError::NothingToUndo);
        }
        self.restore(self.cursor - 1, surface).await
    }

    /// Step forward one entry and restore it into `surface`.
    pub async fn redo(&mut self, surface: &mut RasterSurface) -> Result<(), CanvasError> {
        if !self.can_redo() {
            return Err(CanvasError::NothingToRedo);
        }
        self.restore(self.cursor + 1, surface).await
    }

    /// Blank `surface` and restart the log from it.
    pub fn clear(&mut self, surface: &mut RasterSurface) -> Result<(), CanvasError> {
        surface.fill_white();
        self.entries.clear();
        self.cursor = 0;
        self.snapshot(surface)
    }

    async fn restore(&mut self, target: usize, surface: &mut RasterSurface) -> Result<(), CanvasError> {
        let bytes = Arc::clone(&self.entries[target]);
        let decoded = tokio::task::spawn_blocking(move || RasterSurface::decode_png(&bytes)).await??;
        surface.restore_from(decoded)?;
        self.cursor = target;

        tracing::debug!(cursor = self.cursor, len = self.entries.len(), "Canvas snapshot restored");
        Ok(())
    }
}
