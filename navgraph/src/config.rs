use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Side length of a grid cell used when nothing else is configured
pub const DEFAULT_CELL_SIZE: f32 = 10.0;

/// Parameters applied when a graph is constructed
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Side length of a square cell, in map units
    pub cell_size: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl GraphConfig {
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self { cell_size }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(BuildError::InvalidCellSize(self.cell_size))
        }
    }
}
