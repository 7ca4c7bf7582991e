use serde::{Deserialize, Serialize};

use crate::style::CellStyle;

/// Contents of one cell
///
/// `value` is the displayed text. `formula` is carried verbatim and never evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellData {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

/// The value every absent cell reads as
pub(crate) static EMPTY_CELL: CellData = CellData {
    value: String::new(),
    formula: None,
    style: None,
};

impl CellData {
    /// Create a cell holding plain text
    pub fn text(value: impl Into<String>) -> Self {
        CellData {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Check if the cell is indistinguishable from an absent one
    pub fn is_empty(&self) -> bool {
        *self == EMPTY_CELL
    }

    /// The finite number the displayed value starts with, if any
    ///
    /// Trailing text is ignored, so "12px" reads as 12 and "1,000" as 1.
    pub fn numeric_value(&self) -> Option<f64> {
        let text = self.value.trim();
        let len = leading_number_len(text.as_bytes());
        if len == 0 {
            return None;
        }
        text[..len].parse::<f64>().ok().filter(|n| n.is_finite())
    }

    pub fn style_or_default(&self) -> CellStyle {
        self.style.clone().unwrap_or_default()
    }

    /// Apply a partial update: fields set in `patch` overwrite, the rest are kept
    pub fn apply(&mut self, patch: &CellPatch) {
        if let Some(value) = &patch.value {
            self.value = value.clone();
        }
        if let Some(formula) = &patch.formula {
            self.formula = formula.clone();
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
    }
}

/// A partial [`CellData`]
///
/// The outer `Option` says whether a field is touched at all; for `formula` and `style` the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Option<CellStyle>>,
}

impl CellPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn formula(mut self, formula: Option<String>) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn style(mut self, style: Option<CellStyle>) -> Self {
        self.style = Some(style);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.formula.is_none() && self.style.is_none()
    }
}

/// Length of the longest prefix of `text` that reads as a decimal float, or 0 if none
fn leading_number_len(text: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < text.len() && text[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(text.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if text.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(text.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(text.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell() {
        assert!(CellData::default().is_empty());
        assert!(!CellData::text("x").is_empty());
        assert!(!CellData::default().with_style(CellStyle::new()).is_empty());
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(CellData::text("42").numeric_value(), Some(42.0));
        assert_eq!(CellData::text(" 3.5 ").numeric_value(), Some(3.5));
        assert_eq!(CellData::text("-1e3").numeric_value(), Some(-1000.0));
        assert_eq!(CellData::text("").numeric_value(), None);
        assert_eq!(CellData::text("   ").numeric_value(), None);
        assert_eq!(CellData::text("abc").numeric_value(), None);
        assert_eq!(CellData::text("inf").numeric_value(), None);
        assert_eq!(CellData::text("NaN").numeric_value(), None);
    }

    #[test]
    fn test_numeric_value_reads_leading_number() {
        assert_eq!(CellData::text("12px").numeric_value(), Some(12.0));
        assert_eq!(CellData::text("1,000").numeric_value(), Some(1.0));
        assert_eq!(CellData::text("5.").numeric_value(), Some(5.0));
        assert_eq!(CellData::text(".25kg").numeric_value(), Some(0.25));
        assert_eq!(CellData::text("2e").numeric_value(), Some(2.0));
        assert_eq!(CellData::text("3e+2x").numeric_value(), Some(300.0));
        assert_eq!(CellData::text("-.").numeric_value(), None);
        assert_eq!(CellData::text("$5").numeric_value(), None);
        assert_eq!(CellData::text("1e999").numeric_value(), None);
    }

    #[test]
    fn test_formula_is_inert() {
        let cell = CellData::text("3").with_formula("=1+2");
        assert_eq!(cell.formula.as_deref(), Some("=1+2"));
        assert_eq!(cell.value, "3");
    }

    #[test]
    fn test_apply_patch() {
        let mut cell = CellData::text("old")
            .with_formula("=A2")
            .with_style(CellStyle::new().with_bold(true));

        cell.apply(&CellPatch::new().value("new"));
        assert_eq!(cell.value, "new");
        assert_eq!(cell.formula.as_deref(), Some("=A2"));
        assert_eq!(cell.style, Some(CellStyle::new().with_bold(true)));

        cell.apply(&CellPatch::new().formula(None).style(None));
        assert_eq!(cell, CellData::text("new"));
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let json = serde_json::to_string(&CellData::text("10")).unwrap();
        assert_eq!(json, r#"{"value":"10"}"#);

        let cell: CellData = serde_json::from_str(r#"{"value":"1","formula":"=A1"}"#).unwrap();
        assert_eq!(cell.formula.as_deref(), Some("=A1"));
    }
}
