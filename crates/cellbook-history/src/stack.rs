use cellbook_core::Workbook;

use crate::snapshot::Snapshot;

/// Default number of undo levels; 0 keeps every level
pub const DEFAULT_MAX_SIZE: usize = 0;

/// Linear undo/redo history over whole-workbook snapshots
pub struct HistoryManager {
    /// Snapshots taken before each recorded mutation, oldest first
    undo_stack: Vec<Snapshot>,
    /// Snapshots taken before each undo, most recent last
    redo_stack: Vec<Snapshot>,
    /// Maximum number of undo levels; 0 means unbounded
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl HistoryManager {
    /// Create a new history manager with the specified max undo levels
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        // Limit stack size
        if self.max_size > 0 {
            while self.undo_stack.len() > self.max_size {
                let dropped = self.undo_stack.remove(0);
                tracing::trace!("Dropped oldest undo level: {}", dropped.description());
            }
        }
    }

    /// Capture `current` as the state to return to, and invalidate redo
    ///
    /// Call this immediately before applying a mutation.
    pub fn begin_mutation(&mut self, current: &Workbook, description: impl Into<String>) {
        let snapshot = Snapshot::new(current.clone(), description);
        tracing::debug!("Recorded undo snapshot: {}", snapshot.description());
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    /// Snapshot `workbook`, then apply `f` to it as one undo step
    pub fn record<R>(
        &mut self,
        workbook: &mut Workbook,
        description: impl Into<String>,
        f: impl FnOnce(&mut Workbook) -> R,
    ) -> R {
        self.begin_mutation(workbook, description);
        f(workbook)
    }

    /// Like [`HistoryManager::record`], but a failed `f` leaves the workbook and history untouched
    pub fn try_record<T, E>(
        &mut self,
        workbook: &mut Workbook,
        description: impl Into<String>,
        f: impl FnOnce(&mut Workbook) -> Result<T, E>,
    ) -> Result<T, E> {
        let before = workbook.clone();
        match f(workbook) {
            Ok(value) => {
                self.begin_mutation(&before, description);
                Ok(value)
            }
            Err(err) => {
                *workbook = before;
                Err(err)
            }
        }
    }

    /// Step back one mutation
    ///
    /// Returns the workbook to restore, or `None` (and changes nothing) if there is nothing to undo.
    pub fn undo(&mut self, current: &Workbook) -> Option<Workbook> {
        let snapshot = self.undo_stack.pop()?;
        let (restored, redo) = snapshot.exchange(current.clone());
        tracing::debug!("Undo: {}", redo.description());
        self.redo_stack.push(redo);
        Some(restored)
    }

    /// Re-apply the most recently undone mutation
    pub fn redo(&mut self, current: &Workbook) -> Option<Workbook> {
        let snapshot = self.redo_stack.pop()?;
        let (restored, undo) = snapshot.exchange(current.clone());
        tracing::debug!("Redo: {}", undo.description());
        self.push_undo(undo);
        Some(restored)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the mutation that would be undone
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(Snapshot::description)
    }

    /// Get the description of the mutation that would be redone
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(Snapshot::description)
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_size", &self.max_size)
            .finish()
    }
}
