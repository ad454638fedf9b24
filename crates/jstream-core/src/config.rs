//! Tool configuration shared by every jstream binary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Spaces added to each fitted column width in rendered tables.
    pub table_padding: usize,

    /// Fixed column width used by `jprint` when streaming without `--sponge`.
    pub print_col_width: usize,

    /// `tracing` filter directive for the stderr log.
    pub log_filter: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            table_padding: 2,
            print_col_width: 16,
            log_filter: "warn".to_string(),
        }
    }
}

impl ToolConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `JSTREAM_TABLE_PADDING`: padding added to fitted table columns
    /// - `JSTREAM_PRINT_COL_WIDTH`: default `jprint` column width
    /// - `JSTREAM_LOG`: log filter directive (e.g. `debug`, `jstream_io=trace`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    /// Values that fail to parse leave the default in place.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("JSTREAM_TABLE_PADDING") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.table_padding = v;
            }
        }

        if let Some(s) = lookup("JSTREAM_PRINT_COL_WIDTH") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.print_col_width = v;
            }
        }

        if let Some(s) = lookup("JSTREAM_LOG") {
            if !s.trim().is_empty() {
                cfg.log_filter = s;
            }
        }

        cfg
    }
}
