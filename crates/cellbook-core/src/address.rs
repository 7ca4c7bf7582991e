use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{CoreError, Result};

fn cell_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Z]+)([0-9]+)$").expect("static pattern is valid"))
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn label_for_column(index: u32) -> String {
    let mut bytes = Vec::new();
    let mut n = u64::from(index) + 1; // 1-indexed for calculation

    while n > 0 {
        n -= 1;
        bytes.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    bytes.reverse();
    String::from_utf8(bytes).unwrap_or_default()
}

/// Convert column label (A, B, ..., Z, AA, AB, ...) to index (0-indexed)
///
/// Only uppercase ASCII letters are accepted.
pub fn column_for_label(label: &str) -> Result<u32> {
    if label.is_empty() {
        return Err(CoreError::InvalidAddress("empty column label".to_string()));
    }

    let mut col: u64 = 0;
    for c in label.bytes() {
        if !c.is_ascii_uppercase() {
            return Err(CoreError::InvalidAddress(label.to_string()));
        }
        col = col * 26 + u64::from(c - b'A' + 1);
        if col - 1 > u64::from(u32::MAX) {
            return Err(CoreError::InvalidAddress(label.to_string()));
        }
    }

    Ok((col - 1) as u32)
}

/// Cell address (0-indexed internally)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    pub col: u32,
    pub row: u32,
}

impl CellAddress {
    pub const fn new(col: u32, row: u32) -> Self {
        CellAddress { col, row }
    }

    pub const fn origin() -> Self {
        CellAddress { col: 0, row: 0 }
    }

    /// Parse A1 notation (e.g., "A1" -> (0, 0), "B2" -> (1, 1))
    pub fn parse(id: &str) -> Result<Self> {
        let caps = cell_id_pattern()
            .captures(id)
            .ok_or_else(|| CoreError::InvalidAddress(id.to_string()))?;

        let col = column_for_label(&caps[1])?;
        // Rows are 1-indexed in A1 notation
        let row = caps[2]
            .parse::<u64>()
            .ok()
            .and_then(|row| row.checked_sub(1))
            .and_then(|row| u32::try_from(row).ok())
            .ok_or_else(|| CoreError::InvalidAddress(id.to_string()))?;

        Ok(CellAddress { col, row })
    }

    /// Lenient parse for callers that accept the origin as a fallback
    pub fn parse_or_origin(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|_| Self::origin())
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", label_for_column(self.col), u64::from(self.row) + 1)
    }

    /// Move by a signed delta, clamping to `0..=max` on each axis
    pub fn offset(&self, delta_col: i64, delta_row: i64, max_col: u32, max_row: u32) -> Self {
        let col = (i64::from(self.col) + delta_col).clamp(0, i64::from(max_col));
        let row = (i64::from(self.row) + delta_row).clamp(0, i64::from(max_row));
        CellAddress::new(col as u32, row as u32)
    }
}

impl Ord for CellAddress {
    /// Row-major: earlier rows first, then columns left to right
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl PartialOrd for CellAddress {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl FromStr for CellAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        CellAddress::parse(s)
    }
}

impl TryFrom<String> for CellAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        CellAddress::parse(&value)
    }
}

impl From<CellAddress> for String {
    fn from(addr: CellAddress) -> Self {
        addr.to_a1()
    }
}

/// A rectangular range of cells (e.g., A1:B10), always normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RangeCorners")]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

/// Serialized corners of a range, in whatever order they were written
#[derive(Deserialize)]
struct RangeCorners {
    start: CellAddress,
    end: CellAddress,
}

impl From<RangeCorners> for CellRange {
    fn from(corners: RangeCorners) -> Self {
        CellRange::new(corners.start, corners.end)
    }
}

impl CellRange {
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellAddress::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellAddress::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn single(addr: CellAddress) -> Self {
        CellRange {
            start: addr,
            end: addr,
        }
    }

    /// Top-left corner
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Parse "A1:C3" or a single "B2"
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(':') {
            None => Ok(CellRange::single(CellAddress::parse(text)?)),
            Some((a, b)) => Ok(CellRange::new(CellAddress::parse(a)?, CellAddress::parse(b)?)),
        }
    }

    /// Convert to A1:B1 notation
    pub fn to_a1(&self) -> String {
        if self.is_single_cell() {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }

    pub fn contains(&self, addr: CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    pub fn row_count(&self) -> u64 {
        u64::from(self.end.row - self.start.row) + 1
    }

    pub fn col_count(&self) -> u64 {
        u64::from(self.end.col - self.start.col) + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.row_count() * self.col_count()
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over all addresses in the range, row by row
    pub fn iter(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            current: Some(self.start),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl IntoIterator for CellRange {
    type Item = CellAddress;
    type IntoIter = CellRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over the addresses of a range
pub struct CellRangeIter {
    range: CellRange,
    current: Option<CellAddress>,
}

impl Iterator for CellRangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let addr = self.current?;

        self.current = if addr.col < self.range.end.col {
            Some(CellAddress::new(addr.col + 1, addr.row))
        } else if addr.row < self.range.end.row {
            Some(CellAddress::new(self.range.start.col, addr.row + 1))
        } else {
            None
        };

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.current {
            None => 0,
            Some(addr) => {
                let rows_below = u64::from(self.range.end.row - addr.row);
                rows_below * self.range.col_count() + u64::from(self.range.end.col - addr.col) + 1
            }
        };
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// All addresses in the rectangle spanned by `anchor` and `target`, row-major
pub fn build_range(anchor: CellAddress, target: CellAddress) -> Vec<CellAddress> {
    CellRange::new(anchor, target).iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_label_for_column() {
        assert_eq!(label_for_column(0), "A");
        assert_eq!(label_for_column(25), "Z");
        assert_eq!(label_for_column(26), "AA");
        assert_eq!(label_for_column(51), "AZ");
        assert_eq!(label_for_column(52), "BA");
        assert_eq!(label_for_column(701), "ZZ");
        assert_eq!(label_for_column(702), "AAA");
    }

    #[test]
    fn test_label_for_column_max() {
        let label = label_for_column(u32::MAX);
        assert_eq!(column_for_label(&label), Ok(u32::MAX));
    }

    #[test]
    fn test_column_for_label() {
        assert_eq!(column_for_label("A"), Ok(0));
        assert_eq!(column_for_label("Z"), Ok(25));
        assert_eq!(column_for_label("AA"), Ok(26));
        assert_eq!(column_for_label("AZ"), Ok(51));
        assert_eq!(column_for_label("ZZ"), Ok(701));
    }

    #[test]
    fn test_column_for_label_rejects_bad_input() {
        assert!(column_for_label("").is_err());
        assert!(column_for_label("a").is_err());
        assert!(column_for_label("A1").is_err());
        assert!(column_for_label("ZZZZZZZZ").is_err());
    }

    #[test]
    fn test_parse_cell_id() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("B2").unwrap(), CellAddress::new(1, 1));

        let addr = CellAddress::parse("AA100").unwrap();
        assert_eq!(addr, CellAddress::new(26, 99));
        assert_eq!(addr.to_a1(), "AA100");
    }

    #[test]
    fn test_parse_cell_id_rejects_malformed() {
        for bad in ["", "A", "1", "1A", "a1", "A0", "A1B", " A1", "A-1", "A99999999999", "A4294967297"] {
            let err = CellAddress::parse(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidAddress(_)), "{bad}");
        }
    }

    #[test]
    fn test_parse_or_origin() {
        assert_eq!(CellAddress::parse_or_origin("C3"), CellAddress::new(2, 2));
        assert_eq!(CellAddress::parse_or_origin("nonsense"), CellAddress::origin());
    }

    #[test]
    fn test_offset_clamps() {
        let addr = CellAddress::new(0, 0);
        assert_eq!(addr.offset(-1, -1, 10, 10), CellAddress::new(0, 0));
        assert_eq!(CellAddress::new(10, 10).offset(1, 1, 10, 10), CellAddress::new(10, 10));
        assert_eq!(CellAddress::new(25, 0).offset(1, 0, 100, 100).to_a1(), "AA1");
    }

    #[test]
    fn test_range_parse() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range.start(), CellAddress::new(0, 0));
        assert_eq!(range.end(), CellAddress::new(2, 2));
        assert_eq!(range.to_a1(), "A1:C3");

        assert_eq!(CellRange::parse("B2").unwrap().to_a1(), "B2");
        assert!(CellRange::parse("A1:").is_err());
    }

    #[test]
    fn test_address_ordering_is_row_major() {
        let mut addrs = vec![CellAddress::new(0, 1), CellAddress::new(2, 0), CellAddress::new(1, 0)];
        addrs.sort();
        let ids: Vec<_> = addrs.iter().map(|a| a.to_a1()).collect();
        assert_eq!(ids, vec!["B1", "C1", "A2"]);
    }

    #[test]
    fn test_range_iteration_is_row_major() {
        let range = CellRange::parse("A1:B2").unwrap();
        let ids: Vec<_> = range.iter().map(|a| a.to_a1()).collect();
        assert_eq!(ids, vec!["A1", "B1", "A2", "B2"]);
        assert_eq!(range.iter().size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_build_range_shift_click_shape() {
        let ids: Vec<_> = build_range(CellAddress::new(0, 0), CellAddress::new(2, 2))
            .into_iter()
            .map(|a| a.to_a1())
            .collect();
        assert_eq!(ids, vec!["A1", "B1", "C1", "A2", "B2", "C2", "A3", "B3", "C3"]);
    }

    #[test]
    fn test_range_iter_at_extreme_corner() {
        let corner = CellAddress::new(u32::MAX, u32::MAX);
        let range = CellRange::new(CellAddress::new(u32::MAX - 1, u32::MAX), corner);
        assert_eq!(range.iter().count(), 2);
    }

    #[test]
    fn test_last_row_round_trips() {
        let addr = CellAddress::new(0, u32::MAX);
        assert_eq!(addr.to_a1(), "A4294967296");
        assert_eq!(CellAddress::parse("A4294967296"), Ok(addr));

        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(serde_json::from_str::<CellAddress>(&json).unwrap(), addr);
    }

    #[test]
    fn test_range_deserialize_normalizes() {
        let range: CellRange = serde_json::from_str(r#"{"start":"C3","end":"A1"}"#).unwrap();
        assert_eq!(range, CellRange::parse("A1:C3").unwrap());
        assert_eq!(range.cell_count(), 9);
        assert_eq!(range.iter().count(), 9);

        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":"A1","end":"C3"}"#);
    }

    #[test]
    fn test_address_serializes_as_a1() {
        let json = serde_json::to_string(&CellAddress::new(26, 11)).unwrap();
        assert_eq!(json, "\"AA12\"");
        let back: CellAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellAddress::new(26, 11));
        assert!(serde_json::from_str::<CellAddress>("\"12AA\"").is_err());
    }

    #[test]
    fn test_label_bijection_low_range() {
        for i in 0..=10_000u32 {
            assert_eq!(column_for_label(&label_for_column(i)), Ok(i));
        }
    }

    proptest! {
        #[test]
        fn prop_label_bijection(i in any::<u32>()) {
            prop_assert_eq!(column_for_label(&label_for_column(i)), Ok(i));
        }

        #[test]
        fn prop_label_round_trip(label in "[A-Z]{1,6}") {
            let index = column_for_label(&label).unwrap();
            prop_assert_eq!(label_for_column(index), label);
        }

        #[test]
        fn prop_address_round_trip(col in any::<u32>(), row in any::<u32>()) {
            let addr = CellAddress::new(col, row);
            prop_assert_eq!(CellAddress::parse(&addr.to_a1()), Ok(addr));
        }

        #[test]
        fn prop_range_is_bounding_rectangle(
            c1 in 0u32..60, r1 in 0u32..60, c2 in 0u32..60, r2 in 0u32..60,
        ) {
            let p = CellAddress::new(c1, r1);
            let q = CellAddress::new(c2, r2);
            let cells = build_range(p, q);

            let expected = (c1.abs_diff(c2) as usize + 1) * (r1.abs_diff(r2) as usize + 1);
            prop_assert_eq!(cells.len(), expected);
            prop_assert!(cells.contains(&p));
            prop_assert!(cells.contains(&q));
            for a in &cells {
                prop_assert!(a.col >= c1.min(c2) && a.col <= c1.max(c2));
                prop_assert!(a.row >= r1.min(r2) && a.row <= r1.max(r2));
            }
        }
    }
}
