use serde::{Deserialize, Serialize};

/// Which part of the session a completed operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Change {
    /// Cells, sheets or the active sheet
    Workbook,
    Selection,
    /// Edit mode or the edit buffer
    Edit,
    /// Undo/redo availability
    History,
}

/// Handle returned by [`crate::Session::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Observer = Box<dyn FnMut(&Change) + Send>;
