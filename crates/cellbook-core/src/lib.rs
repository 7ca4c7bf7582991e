pub mod address;
pub mod cell;
pub mod error;
pub mod sheet;
pub mod state;
pub mod stats;
pub mod style;
pub mod workbook;

pub use address::{build_range, column_for_label, label_for_column, CellAddress, CellRange};
pub use cell::{CellData, CellPatch};
pub use error::{CoreError, ErrorKind, Result};
pub use sheet::{Sheet, SheetId};
pub use state::{
    EditMode, EditState, GridBounds, GridState, InputAction, Key, KeyEffect, KeyOutcome,
    Modifiers, Selection, SelectionRange,
};
pub use stats::SelectionStats;
pub use style::{CellStyle, Color, HorizontalAlign};
pub use workbook::Workbook;
