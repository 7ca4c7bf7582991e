use serde::{Deserialize, Serialize};

use crate::address::CellAddress;
use crate::sheet::Sheet;

/// Aggregates over the numeric cells of a selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub count: usize,
    pub sum: f64,
    pub average: f64,
}

impl SelectionStats {
    /// Compute count, sum and average over `cells`, ignoring blank and non-numeric values
    ///
    /// Returns `None` when no selected cell holds a number.
    pub fn compute<'a, I>(sheet: &Sheet, cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a CellAddress>,
    {
        let (count, sum) = cells
            .into_iter()
            .filter_map(|addr| sheet.get_cell(*addr).numeric_value())
            .fold((0usize, 0.0f64), |(count, sum), n| (count + 1, sum + n));

        if count == 0 {
            return None;
        }

        Some(SelectionStats {
            count,
            sum,
            average: sum / count as f64,
        })
    }
}
