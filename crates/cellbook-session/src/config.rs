use anyhow::Context;
use cellbook_core::GridBounds;
use cellbook_history::DEFAULT_MAX_SIZE;
use serde::{Deserialize, Serialize};
use std::env;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Undo levels kept before the oldest is dropped; 0 keeps everything
    pub max_undo_levels: usize,
    /// Number of addressable rows
    pub max_rows: u32,
    /// Number of addressable columns
    pub max_cols: u32,
    /// Start a typed edit with the typed character instead of the cell's value
    pub forward_typed_char: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_undo_levels: DEFAULT_MAX_SIZE,
            max_rows: GridBounds::MAX_ROWS,
            max_cols: GridBounds::MAX_COLS,
            forward_typed_char: false,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_undo_levels = match lookup("CELLBOOK_MAX_UNDO") {
            Some(v) => v.trim().parse::<usize>().context("CELLBOOK_MAX_UNDO must be a number")?,
            None => defaults.max_undo_levels,
        };
        let max_rows = match lookup("CELLBOOK_MAX_ROWS") {
            Some(v) => v.trim().parse::<u32>().context("CELLBOOK_MAX_ROWS must be a number")?,
            None => defaults.max_rows,
        };
        let max_cols = match lookup("CELLBOOK_MAX_COLS") {
            Some(v) => v.trim().parse::<u32>().context("CELLBOOK_MAX_COLS must be a number")?,
            None => defaults.max_cols,
        };
        let forward_typed_char = match lookup("CELLBOOK_FORWARD_TYPED_CHAR") {
            Some(v) => parse_flag(&v).context("CELLBOOK_FORWARD_TYPED_CHAR must be true or false")?,
            None => defaults.forward_typed_char,
        };

        if max_rows == 0 || max_cols == 0 {
            anyhow::bail!("grid must have at least one row and one column");
        }

        Ok(Self {
            max_undo_levels,
            max_rows,
            max_cols,
            forward_typed_char,
        })
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.max_rows, self.max_cols)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
