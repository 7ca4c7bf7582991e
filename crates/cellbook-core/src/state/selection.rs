use serde::{Deserialize, Serialize};

use crate::address::{CellAddress, CellRange};
use crate::error::CoreError;

/// The set of selected cells
///
/// Every gesture except ctrl-click produces a rectangle. Ctrl-click produces an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cells", rename_all = "camelCase")]
pub enum SelectionRange {
    Rect(CellRange),
    Cells(Vec<CellAddress>),
}

impl SelectionRange {
    pub fn single_cell(addr: CellAddress) -> Self {
        SelectionRange::Rect(CellRange::single(addr))
    }

    /// Rectangle spanning two corners in any order
    pub fn spanning(a: CellAddress, b: CellAddress) -> Self {
        SelectionRange::Rect(CellRange::new(a, b))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SelectionRange::Rect(_) => false,
            SelectionRange::Cells(cells) => cells.is_empty(),
        }
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, SelectionRange::Rect(_))
    }

    pub fn contains(&self, addr: CellAddress) -> bool {
        match self {
            SelectionRange::Rect(range) => range.contains(addr),
            SelectionRange::Cells(cells) => cells.contains(&addr),
        }
    }

    pub fn cell_count(&self) -> u64 {
        match self {
            SelectionRange::Rect(range) => range.cell_count(),
            SelectionRange::Cells(cells) => cells.len() as u64,
        }
    }

    /// The first cell in enumeration order
    pub fn first(&self) -> Option<CellAddress> {
        match self {
            SelectionRange::Rect(range) => Some(range.start()),
            SelectionRange::Cells(cells) => cells.first().copied(),
        }
    }

    /// Materialize the selected cells; rectangles enumerate row-major
    pub fn cells(&self) -> Vec<CellAddress> {
        match self {
            SelectionRange::Rect(range) => range.iter().collect(),
            SelectionRange::Cells(cells) => cells.clone(),
        }
    }
}

/// Active cell, selected range and the pivot cell for shift-extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SelectionParts")]
pub struct Selection {
    active_cell: CellAddress,
    range: SelectionRange,
    anchor: CellAddress,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionParts {
    active_cell: CellAddress,
    range: SelectionRange,
    anchor: CellAddress,
}

impl TryFrom<SelectionParts> for Selection {
    type Error = CoreError;

    fn try_from(parts: SelectionParts) -> Result<Self, Self::Error> {
        if !parts.range.is_empty() && !parts.range.contains(parts.active_cell) {
            return Err(CoreError::ActiveCellOutsideSelection(parts.active_cell));
        }
        Ok(Selection {
            active_cell: parts.active_cell,
            range: parts.range,
            anchor: parts.anchor,
        })
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        let origin = CellAddress::origin();
        Self {
            active_cell: origin,
            range: SelectionRange::single_cell(origin),
            anchor: origin,
        }
    }

    pub fn active_cell(&self) -> CellAddress {
        self.active_cell
    }

    pub fn range(&self) -> &SelectionRange {
        &self.range
    }

    pub fn anchor(&self) -> CellAddress {
        self.anchor
    }

    pub fn is_selected(&self, addr: CellAddress) -> bool {
        self.range.contains(addr)
    }

    /// Collapse the selection onto one cell
    pub fn select_cell(&mut self, addr: CellAddress) {
        self.active_cell = addr;
        self.anchor = addr;
        self.range = SelectionRange::single_cell(addr);
    }

    /// Add a cell to the selection without moving the active cell
    ///
    /// Returns false if the cell was already selected.
    pub fn toggle_add(&mut self, addr: CellAddress) -> bool {
        if self.range.contains(addr) {
            return false;
        }

        let mut cells = self.range.cells();
        cells.push(addr);
        self.range = SelectionRange::Cells(cells);
        true
    }

    /// Replace the range with the rectangle from the first selected cell to `target`
    ///
    /// If that rectangle would leave the active cell out, the anchor is the pivot instead.
    pub fn extend_to(&mut self, target: CellAddress) {
        let Some(first) = self.range.first() else {
            self.select_cell(target);
            return;
        };

        let range = CellRange::new(first, target);
        self.range = if range.contains(self.active_cell) {
            SelectionRange::Rect(range)
        } else {
            SelectionRange::spanning(self.anchor, target)
        };
    }

    /// Replace the range with a rectangle between two cells, leaving active cell and anchor alone
    pub fn set_rect(&mut self, a: CellAddress, b: CellAddress) {
        self.range = SelectionRange::spanning(a, b);
    }
}
