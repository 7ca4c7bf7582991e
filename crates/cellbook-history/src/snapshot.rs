use cellbook_core::Workbook;

/// A full copy of the workbook taken before a mutation
///
/// Sheets are shared with the live workbook until one side writes to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    workbook: Workbook,
    description: String,
}

impl Snapshot {
    pub fn new(workbook: Workbook, description: impl Into<String>) -> Self {
        Self {
            workbook,
            description: description.into(),
        }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Name of the mutation this snapshot precedes (e.g. "Set B2")
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Swap the stored state for `current`, returning the stored state
    pub(crate) fn exchange(self, current: Workbook) -> (Workbook, Snapshot) {
        let restored = self.workbook;
        (restored, Snapshot::new(current, self.description))
    }
}
