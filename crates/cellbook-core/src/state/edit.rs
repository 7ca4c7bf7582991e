use serde::{Deserialize, Serialize};

use crate::address::CellAddress;

/// Edit mode determines whether a cell's text is being edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum EditMode {
    /// Not editing, just viewing the spreadsheet
    #[default]
    Viewing,
    /// Editing one cell; `buffer` holds the uncommitted text
    Editing { position: CellAddress, buffer: String },
}

impl EditMode {
    pub fn is_viewing(&self) -> bool {
        matches!(self, EditMode::Viewing)
    }

    pub fn is_editing(&self) -> bool {
        !self.is_viewing()
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            EditMode::Viewing => None,
            EditMode::Editing { buffer, .. } => Some(buffer),
        }
    }

    pub fn position(&self) -> Option<CellAddress> {
        match self {
            EditMode::Viewing => None,
            EditMode::Editing { position, .. } => Some(*position),
        }
    }
}

/// Manages the edit state of the grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
    mode: EditMode,
    /// Cell text before editing started (returned on cancel)
    original: Option<String>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing `position`; an edit already in progress is discarded
    pub fn start(&mut self, position: CellAddress, original: String, buffer: String) {
        self.original = Some(original);
        self.mode = EditMode::Editing { position, buffer };
    }

    /// Replace the buffer; returns false when not editing
    pub fn update_buffer(&mut self, text: String) -> bool {
        match &mut self.mode {
            EditMode::Viewing => false,
            EditMode::Editing { buffer, .. } => {
                *buffer = text;
                true
            }
        }
    }

    /// Leave edit mode, returning the edited cell and its new text
    pub fn commit(&mut self) -> Option<(CellAddress, String)> {
        match std::mem::take(&mut self.mode) {
            EditMode::Viewing => None,
            EditMode::Editing { position, buffer } => {
                self.original = None;
                Some((position, buffer))
            }
        }
    }

    /// Leave edit mode without writing, returning the original text
    pub fn cancel(&mut self) -> Option<String> {
        if self.mode.is_editing() {
            self.mode = EditMode::Viewing;
            self.original.take()
        } else {
            None
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn buffer(&self) -> Option<&str> {
        self.mode.buffer()
    }

    pub fn position(&self) -> Option<CellAddress> {
        self.mode.position()
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Whether the buffer differs from the text the edit started with
    pub fn is_dirty(&self) -> bool {
        match (self.buffer(), self.original()) {
            (Some(buffer), Some(original)) => buffer != original,
            (Some(_), None) => true,
            _ => false,
        }
    }
}
