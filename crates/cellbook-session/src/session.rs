use cellbook_core::{
    CellAddress, CellData, CellPatch, CellRange, CellStyle, GridState, Key, KeyEffect, KeyOutcome,
    Modifiers, Selection, SelectionStats, Sheet, SheetId, Workbook,
};
use cellbook_history::HistoryManager;

use crate::change::{Change, Observer, SubscriptionId};
use crate::config::SessionConfig;

/// The workbook, its selection and edit state, and the undo history, owned together
///
/// Every mutation of the workbook goes through a method here so that history and observers
/// stay consistent. Each method fully applies its change before returning.
pub struct Session {
    workbook: Workbook,
    grid: GridState,
    history: HistoryManager,
    config: SessionConfig,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_workbook(Workbook::new(), config)
    }

    /// Start a session over an existing workbook, with empty history
    pub fn with_workbook(workbook: Workbook, config: SessionConfig) -> Self {
        let grid = GridState::new(config.bounds()).with_forward_typed_char(config.forward_typed_char);
        Self {
            workbook,
            grid,
            history: HistoryManager::new(config.max_undo_levels),
            config,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // Read accessors

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn active_sheet(&self) -> &Sheet {
        self.workbook.active_sheet()
    }

    pub fn active_sheet_id(&self) -> &SheetId {
        self.workbook.active_sheet_id()
    }

    /// Cell on the active sheet
    pub fn cell(&self, addr: CellAddress) -> &CellData {
        self.workbook.active_sheet().get_cell(addr)
    }

    pub fn selection(&self) -> &Selection {
        &self.grid.selection
    }

    pub fn active_cell(&self) -> CellAddress {
        self.grid.selection.active_cell()
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn is_editing(&self) -> bool {
        self.grid.edit.is_editing()
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.grid.edit.buffer()
    }

    /// Count, sum and average of the numeric values in the selection
    pub fn selection_stats(&self) -> Option<SelectionStats> {
        let cells = self.grid.selection.range().cells();
        SelectionStats::compute(self.workbook.active_sheet(), &cells)
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // Observers

    /// Register a callback run after each completed change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Change) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was already removed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: Change) {
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }

    fn notify_mutation(&mut self) {
        self.notify(Change::Workbook);
        self.notify(Change::History);
    }

    // Cell mutations

    /// Apply several writes as one undo step
    pub fn transact<R>(
        &mut self,
        description: impl Into<String>,
        f: impl FnOnce(&mut Workbook) -> R,
    ) -> R {
        let description = description.into();
        tracing::debug!("Transaction: {}", description);
        let result = self.history.record(&mut self.workbook, description, f);
        self.notify_mutation();
        result
    }

    /// Replace the value of a cell on the active sheet, keeping its formula and style
    pub fn set_cell_value(&mut self, addr: CellAddress, value: impl Into<String>) {
        let value = value.into();
        self.transact(format!("Set {}", addr), |wb| {
            wb.active_sheet_mut().set_cell_value(addr, value)
        });
    }

    /// Shallow-merge a partial update into a cell on the active sheet
    pub fn update_cell(&mut self, addr: CellAddress, patch: &CellPatch) {
        self.transact(format!("Update {}", addr), |wb| {
            wb.active_sheet_mut().update_cell(addr, patch)
        });
    }

    /// Merge a partial style into one cell on the active sheet
    pub fn update_cell_style(&mut self, addr: CellAddress, patch: &CellStyle) {
        self.transact(format!("Format {}", addr), |wb| {
            wb.active_sheet_mut().update_cell_style(addr, patch)
        });
    }

    /// Merge a partial style into each listed cell as one undo step
    pub fn update_cells_style(&mut self, addrs: &[CellAddress], patch: &CellStyle) {
        if addrs.is_empty() {
            return;
        }
        self.transact(format!("Format {} cells", addrs.len()), |wb| {
            wb.active_sheet_mut().update_cells_style(addrs, patch)
        });
    }

    /// Merge a partial style into every selected cell
    pub fn format_selection(&mut self, patch: &CellStyle) {
        let cells = self.grid.selection.range().cells();
        self.update_cells_style(&cells, patch);
    }

    // Sheet operations (not recorded in history)

    fn abandon_edit(&mut self) {
        if self.grid.edit.cancel().is_some() {
            self.notify(Change::Edit);
        }
    }

    /// Append a sheet and make it active
    pub fn add_sheet(&mut self) -> SheetId {
        self.abandon_edit();
        let id = self.workbook.add_sheet();
        tracing::debug!("Added sheet {}", id);
        self.notify(Change::Workbook);
        id
    }

    /// Delete a sheet; refused when it is the only one
    pub fn delete_sheet(&mut self, id: &SheetId) -> cellbook_core::Result<()> {
        let was_active = self.workbook.active_sheet_id() == id;
        match self.workbook.delete_sheet(id) {
            Ok(_) => {
                tracing::debug!("Deleted sheet {}", id);
                if was_active {
                    self.abandon_edit();
                }
                self.notify(Change::Workbook);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Refused to delete sheet {}: {}", id, err);
                Err(err)
            }
        }
    }

    pub fn rename_sheet(&mut self, id: &SheetId, name: &str) -> cellbook_core::Result<()> {
        self.workbook.rename_sheet(id, name)?;
        tracing::debug!("Renamed sheet {} to {:?}", id, name.trim());
        self.notify(Change::Workbook);
        Ok(())
    }

    /// Make a sheet active; the selection is kept
    pub fn select_sheet(&mut self, id: &SheetId) -> cellbook_core::Result<()> {
        if self.workbook.active_sheet_id() == id {
            return Ok(());
        }
        self.workbook.set_active_sheet(id)?;
        self.abandon_edit();
        tracing::debug!("Selected sheet {}", id);
        self.notify(Change::Workbook);
        Ok(())
    }

    // Gestures

    pub fn pointer_down(&mut self, addr: CellAddress, modifiers: Modifiers) {
        tracing::trace!("Pointer down on {} ({:?})", addr, modifiers);
        let was_editing = self.grid.edit.is_editing();
        let changed = self.grid.pointer_down(addr, modifiers);
        if was_editing && !self.grid.edit.is_editing() {
            self.notify(Change::Edit);
        }
        if changed {
            self.notify(Change::Selection);
        }
    }

    pub fn pointer_enter(&mut self, addr: CellAddress) {
        if self.grid.pointer_enter(addr) {
            tracing::trace!("Drag extended to {}", addr);
            self.notify(Change::Selection);
        }
    }

    pub fn pointer_up(&mut self) {
        self.grid.pointer_up();
    }

    pub fn double_click(&mut self, addr: CellAddress) {
        tracing::trace!("Double click on {}", addr);
        let before = self.grid.selection.clone();
        self.grid.double_click(addr, self.workbook.active_sheet());
        if self.grid.selection != before {
            self.notify(Change::Selection);
        }
        self.notify(Change::Edit);
    }

    /// Select the range named by a reference such as "B2" or "A1:C3"
    pub fn select_range_ref(&mut self, reference: &str) -> cellbook_core::Result<()> {
        let range = CellRange::parse(reference.trim())?;
        let bounds = self.grid.bounds();
        let (start, end) = (bounds.clamp(range.start()), bounds.clamp(range.end()));

        self.abandon_edit();
        self.grid.selection.select_cell(start);
        self.grid.selection.set_rect(start, end);
        self.notify(Change::Selection);
        Ok(())
    }

    /// Handle a key press on the grid
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        let outcome = self
            .grid
            .handle_key(key, modifiers, self.workbook.active_sheet());
        tracing::trace!("Key {:?} -> {:?}", key, outcome.effect);

        match &outcome.effect {
            KeyEffect::Ignored => {}
            KeyEffect::Moved => self.notify(Change::Selection),
            KeyEffect::EditStarted | KeyEffect::EditCancelled => self.notify(Change::Edit),
            KeyEffect::Commit { position, text } => {
                let (position, text) = (*position, text.clone());
                self.notify(Change::Edit);
                self.write_edit(position, text);
            }
            KeyEffect::Undo => {
                self.undo();
            }
            KeyEffect::Redo => {
                self.redo();
            }
        }
        outcome
    }

    // Editing

    /// Start editing the active cell, seeded with its value
    pub fn start_edit(&mut self) {
        self.grid.start_edit(self.workbook.active_sheet());
        self.notify(Change::Edit);
    }

    /// Replace the edit buffer; returns false when not editing
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) -> bool {
        let updated = self.grid.edit.update_buffer(text.into());
        if updated {
            self.notify(Change::Edit);
        }
        updated
    }

    /// Leave edit mode, writing the buffer to the cell when `commit` is true
    pub fn stop_edit(&mut self, commit: bool) {
        if !commit {
            self.abandon_edit();
            return;
        }

        if let Some((position, text)) = self.grid.edit.commit() {
            self.notify(Change::Edit);
            self.write_edit(position, text);
        }
    }

    fn write_edit(&mut self, position: CellAddress, text: String) {
        if self.workbook.active_sheet().get_cell_value(position) == text {
            tracing::trace!("Edit of {} left the value unchanged", position);
            return;
        }
        tracing::debug!("Committed edit of {}", position);
        self.transact(format!("Edit {}", position), |wb| {
            wb.active_sheet_mut().set_cell_value(position, text)
        });
    }

    // History

    /// Step back one mutation; returns false if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.workbook) {
            Some(previous) => {
                self.workbook = previous;
                self.notify_mutation();
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone mutation; returns false if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.workbook) {
            Some(next) => {
                self.workbook = next;
                self.notify_mutation();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("workbook", &self.workbook)
            .field("grid", &self.grid)
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .finish()
    }
}
