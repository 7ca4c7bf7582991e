use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::address::{CellAddress, CellRange};
use crate::cell::{CellData, CellPatch, EMPTY_CELL};
use crate::style::CellStyle;

/// Stable sheet identifier, distinct from the user-editable name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    pub fn new(id: impl Into<String>) -> Self {
        SheetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(id: &str) -> Self {
        SheetId::new(id)
    }
}

/// A single spreadsheet sheet with sparse storage for cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    /// Sheet name (displayed in tab)
    pub name: String,
    /// Only non-empty cells are stored; keys serialize as A1 text
    #[serde(default)]
    cells: HashMap<CellAddress, CellData>,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new(id: SheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Get a cell, or the empty cell if nothing is stored there
    pub fn get_cell(&self, addr: CellAddress) -> &CellData {
        self.cells.get(&addr).unwrap_or(&EMPTY_CELL)
    }

    /// Check whether an entry exists for the address
    pub fn has_cell(&self, addr: CellAddress) -> bool {
        self.cells.contains_key(&addr)
    }

    /// Get the displayed value of a cell ("" for absent cells)
    pub fn get_cell_value(&self, addr: CellAddress) -> &str {
        &self.get_cell(addr).value
    }

    fn get_cell_mut(&mut self, addr: CellAddress) -> &mut CellData {
        self.cells.entry(addr).or_default()
    }

    fn prune(&mut self, addr: CellAddress) {
        if self.cells.get(&addr).is_some_and(CellData::is_empty) {
            self.cells.remove(&addr);
        }
    }

    /// Replace a cell wholesale; storing the empty cell removes the entry
    pub fn set_cell(&mut self, addr: CellAddress, cell: CellData) {
        if cell.is_empty() {
            self.cells.remove(&addr);
        } else {
            self.cells.insert(addr, cell);
        }
    }

    /// Replace the displayed value, keeping formula and style
    pub fn set_cell_value(&mut self, addr: CellAddress, value: impl Into<String>) {
        self.get_cell_mut(addr).value = value.into();
        self.prune(addr);
    }

    /// Shallow-merge a partial update into a cell
    pub fn update_cell(&mut self, addr: CellAddress, patch: &CellPatch) {
        self.get_cell_mut(addr).apply(patch);
        self.prune(addr);
    }

    /// Merge a partial style into a cell's style, creating the cell if needed
    pub fn update_cell_style(&mut self, addr: CellAddress, patch: &CellStyle) {
        let cell = self.get_cell_mut(addr);
        cell.style.get_or_insert_with(CellStyle::default).merge(patch);
    }

    /// Merge a partial style into every listed cell
    pub fn update_cells_style<'a, I>(&mut self, addrs: I, patch: &CellStyle)
    where
        I: IntoIterator<Item = &'a CellAddress>,
    {
        for addr in addrs {
            self.update_cell_style(*addr, patch);
        }
    }

    /// Remove a cell (make it empty)
    pub fn remove_cell(&mut self, addr: CellAddress) -> Option<CellData> {
        self.cells.remove(&addr)
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in no particular order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &CellData)> + '_ {
        self.cells.iter().map(|(addr, cell)| (*addr, cell))
    }

    /// Get the bounding box of stored cells
    pub fn used_range(&self) -> Option<CellRange> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;

        let (mut min_col, mut min_row) = (first.col, first.row);
        let (mut max_col, mut max_row) = (first.col, first.row);
        for addr in keys {
            min_col = min_col.min(addr.col);
            min_row = min_row.min(addr.row);
            max_col = max_col.max(addr.col);
            max_row = max_row.max(addr.row);
        }

        Some(CellRange::new(
            CellAddress::new(min_col, min_row),
            CellAddress::new(max_col, max_row),
        ))
    }
}
