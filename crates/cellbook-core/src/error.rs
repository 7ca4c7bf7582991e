use thiserror::Error;

use crate::address::CellAddress;
use crate::sheet::SheetId;

/// Broad classification of core errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed cell identifier or range text
    InvalidAddress,
    /// An operation that the current workbook state does not allow
    InvalidOperation,
}

/// Errors raised by the cellbook data model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("cannot delete the last remaining sheet")]
    CannotDeleteLastSheet,

    #[error("sheet not found: {0}")]
    SheetNotFound(SheetId),

    #[error("invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("active cell {0} is outside the selected range")]
    ActiveCellOutsideSelection(CellAddress),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            CoreError::CannotDeleteLastSheet
            | CoreError::SheetNotFound(_)
            | CoreError::InvalidSheetName(_)
            | CoreError::ActiveCellOutsideSelection(_) => ErrorKind::InvalidOperation,
        }
    }

    /// Stable machine-readable code for UI layers
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidAddress(_) => "INVALID_ADDRESS",
            CoreError::CannotDeleteLastSheet => "CANNOT_DELETE_LAST_SHEET",
            CoreError::SheetNotFound(_) => "SHEET_NOT_FOUND",
            CoreError::InvalidSheetName(_) => "INVALID_SHEET_NAME",
            CoreError::ActiveCellOutsideSelection(_) => "ACTIVE_CELL_OUTSIDE_SELECTION",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::InvalidAddress("1A".to_string()).kind(),
            ErrorKind::InvalidAddress
        );
        assert_eq!(CoreError::CannotDeleteLastSheet.kind(), ErrorKind::InvalidOperation);
        assert_eq!(
            CoreError::SheetNotFound(SheetId::new("sheet9")).kind(),
            ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidAddress("A0".to_string());
        assert_eq!(err.to_string(), "invalid cell address: A0");
        assert_eq!(err.code(), "INVALID_ADDRESS");
    }
}
