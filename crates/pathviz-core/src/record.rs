//! The persisted grid record exchanged with save/load collaborators.
//!
//! The JSON shape is `{ "gridWidth", "gridHeight", "nodeSize", "gridValues" }`
//! where `gridValues[x][y]` is one of the cell codes `s`, `g`, `x` or `o`.
//! `nodeSize` is the on-screen cell size and has no meaning for the model;
//! it is carried through untouched.

use serde::{Deserialize, Serialize};

use crate::cell::CellKind;
use crate::error::RecordError;
use crate::geom::Point;
use crate::grid::GridModel;

/// Default on-screen cell size, in pixels.
pub const DEFAULT_NODE_SIZE: u32 = 20;

/// A serializable snapshot of a grid layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRecord {
    pub grid_width: usize,
    pub grid_height: usize,
    pub node_size: u32,
    /// Column-major cell codes: `grid_values[x][y]`.
    pub grid_values: Vec<Vec<char>>,
}

impl GridRecord {
    /// Snapshot the layout of `grid`. Search bookkeeping is not recorded.
    pub fn from_grid(grid: &GridModel, node_size: u32) -> Self {
        let grid_values = (0..grid.width())
            .map(|x| {
                (0..grid.height())
                    .map(|y| grid.kind(Point::new(x, y)).unwrap_or_default().code())
                    .collect()
            })
            .collect();
        Self {
            grid_width: grid.width() as usize,
            grid_height: grid.height() as usize,
            node_size,
            grid_values,
        }
    }

    /// Rebuild a fresh [`GridModel`] from the record.
    ///
    /// The declared dimensions must match the value array, every code must be
    /// known, and exactly one start and one goal must be present.
    pub fn to_grid(&self) -> Result<GridModel, RecordError> {
        if self.grid_values.len() != self.grid_width {
            return Err(RecordError::ColumnCount {
                expected: self.grid_width,
                actual: self.grid_values.len(),
            });
        }
        for (column, values) in self.grid_values.iter().enumerate() {
            if values.len() != self.grid_height {
                return Err(RecordError::ColumnLength {
                    column,
                    expected: self.grid_height,
                    actual: values.len(),
                });
            }
        }

        let mut kinds = Vec::with_capacity(self.grid_width * self.grid_height);
        for y in 0..self.grid_height {
            for x in 0..self.grid_width {
                let code = self.grid_values[x][y];
                let kind = CellKind::from_code(code).ok_or(RecordError::UnknownCode {
                    code,
                    pos: Point::new(x as i32, y as i32),
                })?;
                kinds.push(kind);
            }
        }
        let grid = GridModel::from_layout(self.grid_width as i32, self.grid_height as i32, kinds)?;
        Ok(grid)
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON encoding, as written by the interactive saver.
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a grid from persisted JSON. Nothing is modified on failure, so a
/// host can keep its current grid when this returns an error.
pub fn load_grid(json: &str) -> Result<(GridModel, u32), RecordError> {
    let record =
        GridRecord::from_json(json).inspect_err(|e| log::warn!("rejected grid record: {e}"))?;
    let grid = record
        .to_grid()
        .inspect_err(|e| log::warn!("rejected grid record: {e}"))?;
    Ok((grid, record.node_size))
}

/// Save a grid layout as pretty-printed JSON.
pub fn save_grid(grid: &GridModel, node_size: u32) -> Result<String, RecordError> {
    GridRecord::from_grid(grid, node_size).to_json_pretty()
}
