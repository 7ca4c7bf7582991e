use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::sheet::{Sheet, SheetId};

/// A workbook containing one or more sheets
///
/// Sheets are shared copy-on-write, so cloning a workbook is cheap and a clone never observes
/// later edits made through the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    /// Sheets in tab order; never empty
    sheets: Vec<Arc<Sheet>>,
    active_sheet_id: SheetId,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// Create a new workbook with a single empty "Sheet1"
    pub fn new() -> Self {
        let id = SheetId::new("sheet1");
        Self {
            sheets: vec![Arc::new(Sheet::new(id.clone(), "Sheet1"))],
            active_sheet_id: id,
        }
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> + '_ {
        self.sheets.iter().map(|s| s.as_ref())
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_ids(&self) -> Vec<SheetId> {
        self.sheets.iter().map(|s| s.id.clone()).collect()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn position(&self, id: &SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| &s.id == id)
    }

    pub fn sheet(&self, id: &SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| &s.id == id).map(|s| s.as_ref())
    }

    /// Mutable access to a sheet, detaching it from any snapshot that shares it
    pub fn sheet_mut(&mut self, id: &SheetId) -> Option<&mut Sheet> {
        let index = self.position(id)?;
        Some(Arc::make_mut(&mut self.sheets[index]))
    }

    /// Index of the active sheet, falling back to the first sheet if the id is stale
    fn active_index(&self) -> usize {
        self.position(&self.active_sheet_id).unwrap_or(0)
    }

    /// The id of the sheet that [`Workbook::active_sheet`] resolves to
    pub fn active_sheet_id(&self) -> &SheetId {
        &self.sheets[self.active_index()].id
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active_index()]
    }

    pub fn active_sheet_mut(&mut self) -> &mut Sheet {
        let index = self.active_index();
        Arc::make_mut(&mut self.sheets[index])
    }

    /// Set the active sheet by id
    pub fn set_active_sheet(&mut self, id: &SheetId) -> Result<()> {
        if self.position(id).is_none() {
            return Err(CoreError::SheetNotFound(id.clone()));
        }
        self.active_sheet_id = id.clone();
        Ok(())
    }

    /// Append a new sheet with an auto-generated name (Sheet2, Sheet3, etc.) and activate it
    pub fn add_sheet(&mut self) -> SheetId {
        let mut num = self.sheets.len() + 1;
        let (id, name) = loop {
            let id = SheetId::new(format!("sheet{}", num));
            let name = format!("Sheet{}", num);
            if self.position(&id).is_none() && !self.sheets.iter().any(|s| s.name == name) {
                break (id, name);
            }
            num += 1;
        };

        self.sheets.push(Arc::new(Sheet::new(id.clone(), name)));
        self.active_sheet_id = id.clone();
        id
    }

    /// Remove a sheet; the last remaining sheet can never be removed
    pub fn delete_sheet(&mut self, id: &SheetId) -> Result<Arc<Sheet>> {
        if self.sheets.len() <= 1 {
            return Err(CoreError::CannotDeleteLastSheet);
        }

        let index = self
            .position(id)
            .ok_or_else(|| CoreError::SheetNotFound(id.clone()))?;

        let was_active = self.active_sheet_id() == id;
        let sheet = self.sheets.remove(index);

        if was_active {
            self.active_sheet_id = self.sheets[0].id.clone();
        }

        Ok(sheet)
    }

    /// Rename a sheet; names need not be unique but must not be blank
    pub fn rename_sheet(&mut self, id: &SheetId, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CoreError::InvalidSheetName(
                "name cannot be empty".to_string(),
            ));
        }

        let sheet = self
            .sheet_mut(id)
            .ok_or_else(|| CoreError::SheetNotFound(id.clone()))?;
        sheet.name = new_name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::CellAddress;

    #[test]
    fn test_workbook_creation() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.active_sheet().name, "Sheet1");
        assert_eq!(wb.active_sheet_id().as_str(), "sheet1");
    }

    #[test]
    fn test_add_sheet_activates_it() {
        let mut wb = Workbook::new();
        let id = wb.add_sheet();

        assert_eq!(id.as_str(), "sheet2");
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet2"]);
        assert_eq!(wb.active_sheet_id(), &id);
    }

    #[test]
    fn test_add_sheet_avoids_collision_after_delete() {
        let mut wb = Workbook::new();
        let s2 = wb.add_sheet();
        wb.add_sheet();
        wb.delete_sheet(&s2).unwrap();

        // Two sheets remain (sheet1, sheet3); the next must not reuse "sheet3"
        let next = wb.add_sheet();
        assert_eq!(next.as_str(), "sheet4");
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet3", "Sheet4"]);
    }

    #[test]
    fn test_cannot_delete_last_sheet() {
        let mut wb = Workbook::new();
        let before = wb.clone();

        let err = wb.delete_sheet(&SheetId::new("sheet1")).unwrap_err();
        assert_eq!(err, CoreError::CannotDeleteLastSheet);
        assert_eq!(wb, before);
    }

    #[test]
    fn test_delete_unknown_sheet() {
        let mut wb = Workbook::new();
        wb.add_sheet();
        let err = wb.delete_sheet(&SheetId::new("nope")).unwrap_err();
        assert!(matches!(err, CoreError::SheetNotFound(_)));
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_delete_active_sheet_falls_back_to_first() {
        let mut wb = Workbook::new();
        wb.add_sheet();
        let s3 = wb.add_sheet();
        assert_eq!(wb.active_sheet_id(), &s3);

        wb.delete_sheet(&s3).unwrap();
        assert_eq!(wb.active_sheet_id().as_str(), "sheet1");
    }

    #[test]
    fn test_delete_inactive_sheet_keeps_active() {
        let mut wb = Workbook::new();
        let s2 = wb.add_sheet();
        wb.set_active_sheet(&SheetId::new("sheet1")).unwrap();

        wb.delete_sheet(&s2).unwrap();
        assert_eq!(wb.active_sheet_id().as_str(), "sheet1");
    }

    #[test]
    fn test_rename_sheet() {
        let mut wb = Workbook::new();
        let s2 = wb.add_sheet();

        wb.rename_sheet(&s2, "  Budget ").unwrap();
        assert_eq!(wb.sheet(&s2).unwrap().name, "Budget");

        // Duplicate names are allowed
        wb.rename_sheet(&SheetId::new("sheet1"), "Budget").unwrap();
        assert_eq!(wb.sheet_names(), vec!["Budget", "Budget"]);

        assert!(matches!(
            wb.rename_sheet(&s2, "   "),
            Err(CoreError::InvalidSheetName(_))
        ));
        assert!(matches!(
            wb.rename_sheet(&SheetId::new("missing"), "X"),
            Err(CoreError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_set_active_sheet() {
        let mut wb = Workbook::new();
        wb.add_sheet();

        wb.set_active_sheet(&SheetId::new("sheet1")).unwrap();
        assert_eq!(wb.active_sheet().name, "Sheet1");
        assert!(wb.set_active_sheet(&SheetId::new("sheet7")).is_err());
        assert_eq!(wb.active_sheet().name, "Sheet1");
    }

    #[test]
    fn test_stale_active_id_falls_back() {
        let json = r#"{"sheets":[{"id":"a","name":"A"},{"id":"b","name":"B"}],"activeSheetId":"zzz"}"#;
        let wb: Workbook = serde_json::from_str(json).unwrap();
        assert_eq!(wb.active_sheet().name, "A");
        assert_eq!(wb.active_sheet_id().as_str(), "a");
    }

    #[test]
    fn test_clone_is_isolated_from_later_edits() {
        let mut wb = Workbook::new();
        let snapshot = wb.clone();

        wb.active_sheet_mut().set_cell_value(CellAddress::new(0, 0), "10");

        assert_eq!(snapshot.active_sheet().get_cell_value(CellAddress::new(0, 0)), "");
        assert_eq!(wb.active_sheet().get_cell_value(CellAddress::new(0, 0)), "10");
    }

    #[test]
    fn test_serialization() {
        let mut wb = Workbook::new();
        wb.add_sheet();
        wb.active_sheet_mut().set_cell_value(CellAddress::new(1, 1), "x");

        let json = serde_json::to_string(&wb).unwrap();
        let wb2: Workbook = serde_json::from_str(&json).unwrap();

        assert_eq!(wb2, wb);
    }
}
