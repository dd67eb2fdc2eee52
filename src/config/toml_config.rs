use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::verifier::TargetSpec;
use crate::utils::error::Result;

/// Optional TOML override for the built-in target spec.
///
/// ```toml
/// [target]
/// width_px = 192
/// height_px = 62
/// tolerance = 0.05
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetFileConfig {
    pub target: Option<TargetTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetTable {
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    pub width_in: Option<f64>,
    pub height_in: Option<f64>,
    pub dpi: Option<u32>,
    pub tolerance: Option<f64>,
}

impl TargetFileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TargetFileConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge the overrides over a base spec; unset fields keep the base value.
    pub fn apply(&self, base: TargetSpec) -> TargetSpec {
        let Some(table) = &self.target else {
            return base;
        };

        TargetSpec {
            width_px: table.width_px.unwrap_or(base.width_px),
            height_px: table.height_px.unwrap_or(base.height_px),
            width_in: table.width_in.unwrap_or(base.width_in),
            height_in: table.height_in.unwrap_or(base.height_in),
            dpi: table.dpi.unwrap_or(base.dpi),
            tolerance: table.tolerance.unwrap_or(base.tolerance),
        }
    }
}
