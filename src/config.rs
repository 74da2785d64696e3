//! Sheet configuration module.
//!
//! Handles loading, validating, and merging sheet settings. Configuration is
//! layered: stock defaults are overridden by an optional TOML file, which is in
//! turn overridden by command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! row_size = 10      # Cards per row
//! max_rows = 5       # Rows per sheet before a new sheet is started
//! margin_x = 0       # Pixels trimmed from the left and right of each card
//! margin_y = 0       # Pixels trimmed from the top and bottom of each card
//!
//! [downscale]
//! max_width = 4096   # Sheets wider than this are scaled down
//! ratio = 0.25       # Scale factor applied to oversized sheets
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [layout]
//! row_size = 7
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default number of cards per row.
pub const DEFAULT_ROW_SIZE: u32 = 10;

/// Default number of rows per sheet.
pub const DEFAULT_MAX_ROWS: u32 = 5;

/// Sheets wider than this many pixels are downscaled.
pub const MAX_SHEET_WIDTH: u32 = 4096;

/// Fixed scale factor for oversized sheets. Not a fit-to-ceiling ratio.
pub const DOWNSCALE_RATIO: f64 = 0.25;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete sheet configuration.
///
/// All fields have defaults matching the classic 10×5 deck layout. Config
/// files need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Grid shape and per-card margin trimming.
    pub layout: LayoutConfig,
    /// Oversized sheet handling.
    pub downscale: DownscaleConfig,
}

impl SheetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.row_size == 0 {
            return Err(ConfigError::Validation(
                "layout.row_size must be at least 1".into(),
            ));
        }
        if self.layout.max_rows == 0 {
            return Err(ConfigError::Validation(
                "layout.max_rows must be at least 1".into(),
            ));
        }
        if self.downscale.max_width == 0 {
            return Err(ConfigError::Validation(
                "downscale.max_width must be at least 1".into(),
            ));
        }
        if !(self.downscale.ratio > 0.0 && self.downscale.ratio <= 1.0) {
            return Err(ConfigError::Validation(
                "downscale.ratio must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Grid layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Cards per row. Every sheet reserves this many columns.
    pub row_size: u32,
    /// Maximum rows per sheet.
    pub max_rows: u32,
    /// Pixels trimmed from each horizontal edge of every card.
    pub margin_x: u32,
    /// Pixels trimmed from each vertical edge of every card.
    pub margin_y: u32,
}

impl LayoutConfig {
    /// Capacity of one sheet.
    pub fn files_per_page(&self) -> usize {
        (self.row_size as usize).saturating_mul(self.max_rows as usize)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_size: DEFAULT_ROW_SIZE,
            max_rows: DEFAULT_MAX_ROWS,
            margin_x: 0,
            margin_y: 0,
        }
    }
}

/// Oversized sheet settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownscaleConfig {
    /// Width ceiling in pixels. Only sheets strictly wider are scaled.
    pub max_width: u32,
    /// Scale factor applied to both dimensions of an oversized sheet.
    pub ratio: f64,
}

impl Default for DownscaleConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_SHEET_WIDTH,
            ratio: DOWNSCALE_RATIO,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and command-line overrides merge onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SheetConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge overlays in order onto a base value, then deserialize and validate.
///
/// Later overlays win.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SheetConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: SheetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file on top of stock defaults.
///
/// Unknown keys are rejected and the result is validated.
pub fn load_config(path: &Path) -> Result<SheetConfig, ConfigError> {
    resolve_config(stock_defaults_value(), [load_raw_config(path)?])
}

/// Build a `[layout]` overlay from optional command-line values.
///
/// Absent values are left out so lower layers show through.
pub fn layout_overlay(
    row_size: Option<u32>,
    max_rows: Option<u32>,
    margin_x: Option<u32>,
    margin_y: Option<u32>,
) -> toml::Value {
    let mut layout = toml::map::Map::new();
    let fields = [
        ("row_size", row_size),
        ("max_rows", max_rows),
        ("margin_x", margin_x),
        ("margin_y", margin_y),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            layout.insert(key.to_string(), toml::Value::Integer(i64::from(v)));
        }
    }

    let mut root = toml::map::Map::new();
    if !layout.is_empty() {
        root.insert("layout".to_string(), toml::Value::Table(layout));
    }
    toml::Value::Table(root)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# deck-sheet configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with --config. Command-line flags (-RowSize, -MaxRows,
# -MarginX, -MarginY) override the values in the file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Grid layout
# ---------------------------------------------------------------------------
[layout]
# Cards per row. Every sheet is this many cards wide, even when the last
# row is only partially filled.
row_size = 10

# Rows per sheet. Extra cards spill onto additional sheets.
max_rows = 5

# Pixels trimmed from the left and right edge of every card.
margin_x = 0

# Pixels trimmed from the top and bottom edge of every card.
margin_y = 0

# ---------------------------------------------------------------------------
# Oversized sheets
# ---------------------------------------------------------------------------
[downscale]
# Sheets wider than this many pixels are scaled down before saving.
max_width = 4096

# Scale factor applied to oversized sheets (0 < ratio <= 1).
ratio = 0.25
"##
}
