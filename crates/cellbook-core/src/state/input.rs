use serde::{Deserialize, Serialize};

/// Grid-level actions a key press can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // Editing
    StartEdit,
    ConfirmEdit,
    CancelEdit,

    // History
    Undo,
    Redo,

    // Printable character typed while the grid has focus
    InsertChar(char),

    // Unknown/unmapped
    None,
}

/// Key codes for the keys the grid reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Special keys
    Enter,
    Tab,
    Escape,
    F2,

    // Character key
    Char(char),

    // Unknown
    Unknown,
}

/// Modifier keys state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn ctrl_or_meta(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Maps a key and modifiers to an InputAction
///
/// Whether an action applies depends on edit mode; see [`super::GridState::handle_key`].
pub fn key_to_action(key: Key, modifiers: Modifiers) -> InputAction {
    match key {
        // History shortcuts take precedence over character input
        Key::Char('z' | 'Z') if modifiers.ctrl_or_meta() && modifiers.shift => InputAction::Redo,
        Key::Char('z' | 'Z') if modifiers.ctrl_or_meta() => InputAction::Undo,
        Key::Char('y' | 'Y') if modifiers.ctrl_or_meta() => InputAction::Redo,

        // Arrow keys move regardless of modifiers
        Key::ArrowUp => InputAction::MoveUp,
        Key::ArrowDown => InputAction::MoveDown,
        Key::ArrowLeft => InputAction::MoveLeft,
        Key::ArrowRight => InputAction::MoveRight,
        Key::Tab => InputAction::MoveRight,

        Key::Enter => InputAction::ConfirmEdit,
        Key::Escape => InputAction::CancelEdit,
        Key::F2 => InputAction::StartEdit,

        // Regular character input
        Key::Char(c) if !modifiers.ctrl_or_meta() && !c.is_control() => InputAction::InsertChar(c),

        _ => InputAction::None,
    }
}

pub fn is_navigation_action(action: &InputAction) -> bool {
    matches!(
        action,
        InputAction::MoveUp | InputAction::MoveDown | InputAction::MoveLeft | InputAction::MoveRight
    )
}

pub fn is_history_action(action: &InputAction) -> bool {
    matches!(action, InputAction::Undo | InputAction::Redo)
}
