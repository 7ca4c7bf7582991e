pub mod edit;
pub mod input;
pub mod selection;

pub use edit::{EditMode, EditState};
pub use input::{is_history_action, is_navigation_action, key_to_action, InputAction, Key, Modifiers};
pub use selection::{Selection, SelectionRange};

use serde::{Deserialize, Serialize};

use crate::address::CellAddress;
use crate::sheet::Sheet;

/// Largest addressable row and column, both inclusive and 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub max_row: u32,
    pub max_col: u32,
}

impl GridBounds {
    /// Maximum rows (Excel compatibility)
    pub const MAX_ROWS: u32 = 1_048_576;
    /// Maximum columns (Excel compatibility)
    pub const MAX_COLS: u32 = 16_384;

    /// Bounds for a grid of `rows` by `cols` cells
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            max_row: rows.saturating_sub(1),
            max_col: cols.saturating_sub(1),
        }
    }

    pub fn clamp(&self, addr: CellAddress) -> CellAddress {
        CellAddress::new(addr.col.min(self.max_col), addr.row.min(self.max_row))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(Self::MAX_ROWS, Self::MAX_COLS)
    }
}

/// Transient pointer state between press and release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    anchor: Option<CellAddress>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<CellAddress> {
        self.anchor
    }
}

/// What a key press did, for the layer that owns the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEffect {
    /// Nothing changed
    Ignored,
    /// The active cell moved
    Moved,
    EditStarted,
    /// The edit ended; the text must be written to the cell
    Commit { position: CellAddress, text: String },
    EditCancelled,
    Undo,
    Redo,
}

/// Result of [`GridState::handle_key`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub effect: KeyEffect,
    /// The host should suppress the key's default behavior (e.g. Tab focus traversal)
    pub prevent_default: bool,
}

impl KeyOutcome {
    fn ignored() -> Self {
        Self {
            effect: KeyEffect::Ignored,
            prevent_default: false,
        }
    }

    fn handled(effect: KeyEffect) -> Self {
        Self {
            effect,
            prevent_default: true,
        }
    }
}

/// Selection, edit and drag state for one grid view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    pub selection: Selection,
    pub edit: EditState,
    pub drag: DragState,
    bounds: GridBounds,
    /// Seed the edit buffer with the typed character instead of the existing value
    forward_typed_char: bool,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(GridBounds::default())
    }
}

impl GridState {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            selection: Selection::new(),
            edit: EditState::new(),
            drag: DragState::default(),
            bounds,
            forward_typed_char: false,
        }
    }

    pub fn with_forward_typed_char(mut self, forward: bool) -> Self {
        self.forward_typed_char = forward;
        self
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Primary button press on a cell
    ///
    /// A plain or shift press while editing abandons the edit; a ctrl press leaves it open.
    /// Returns true if the selection changed.
    pub fn pointer_down(&mut self, addr: CellAddress, modifiers: Modifiers) -> bool {
        let addr = self.bounds.clamp(addr);

        if modifiers.ctrl_or_meta() {
            return self.selection.toggle_add(addr);
        }

        self.edit.cancel();

        let before = self.selection.clone();
        if modifiers.shift && !self.selection.range().is_empty() {
            self.selection.extend_to(addr);
        } else {
            self.selection.select_cell(addr);
            self.drag.anchor = Some(addr);
        }
        self.selection != before
    }

    /// Pointer moved into a cell; extends the range while a drag is active
    pub fn pointer_enter(&mut self, addr: CellAddress) -> bool {
        let Some(anchor) = self.drag.anchor else {
            return false;
        };

        let before = self.selection.range().clone();
        self.selection.set_rect(anchor, self.bounds.clamp(addr));
        *self.selection.range() != before
    }

    /// Button released anywhere, inside the grid or not
    pub fn pointer_up(&mut self) {
        self.drag.anchor = None;
    }

    /// Select `addr` and start editing it
    pub fn double_click(&mut self, addr: CellAddress, sheet: &Sheet) {
        let addr = self.bounds.clamp(addr);
        if self.selection.active_cell() != addr || !self.selection.range().is_rect() {
            self.selection.select_cell(addr);
        }
        self.start_edit(sheet);
    }

    /// Start editing the active cell, seeded with its current value
    pub fn start_edit(&mut self, sheet: &Sheet) {
        let position = self.selection.active_cell();
        let value = sheet.get_cell_value(position).to_string();
        self.edit.start(position, value.clone(), value);
    }

    fn start_edit_typed(&mut self, sheet: &Sheet, c: char) {
        let position = self.selection.active_cell();
        let value = sheet.get_cell_value(position).to_string();
        let buffer = if self.forward_typed_char {
            c.to_string()
        } else {
            value.clone()
        };
        self.edit.start(position, value, buffer);
    }

    /// Interpret a key press; `sheet` is the sheet shown in the grid
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers, sheet: &Sheet) -> KeyOutcome {
        let action = key_to_action(key, modifiers);

        match action {
            InputAction::Undo => return KeyOutcome::handled(KeyEffect::Undo),
            InputAction::Redo => return KeyOutcome::handled(KeyEffect::Redo),
            _ => {}
        }

        if self.edit.is_editing() {
            return match action {
                InputAction::ConfirmEdit => match self.edit.commit() {
                    Some((position, text)) => {
                        KeyOutcome::handled(KeyEffect::Commit { position, text })
                    }
                    None => KeyOutcome::ignored(),
                },
                InputAction::CancelEdit => {
                    self.edit.cancel();
                    KeyOutcome::handled(KeyEffect::EditCancelled)
                }
                _ => KeyOutcome::ignored(),
            };
        }

        match action {
            InputAction::MoveUp => self.move_selection(0, -1),
            InputAction::MoveDown | InputAction::ConfirmEdit => self.move_selection(0, 1),
            InputAction::MoveLeft => self.move_selection(-1, 0),
            InputAction::MoveRight => self.move_selection(1, 0),
            InputAction::StartEdit => {
                self.start_edit(sheet);
                KeyOutcome::handled(KeyEffect::EditStarted)
            }
            InputAction::InsertChar(c) => {
                self.start_edit_typed(sheet, c);
                // The host still delivers the character to the editor
                KeyOutcome {
                    effect: KeyEffect::EditStarted,
                    prevent_default: false,
                }
            }
            _ => KeyOutcome::ignored(),
        }
    }

    fn move_selection(&mut self, delta_col: i64, delta_row: i64) -> KeyOutcome {
        let current = self.selection.active_cell();
        let next = current.offset(delta_col, delta_row, self.bounds.max_col, self.bounds.max_row);
        self.selection.select_cell(next);
        KeyOutcome::handled(KeyEffect::Moved)
    }
}
