//! **pathviz-core**: the grid model shared by every pathviz crate.
//!
//! This crate provides geometry primitives, the [`GridModel`] a search runs
//! on (cell kinds plus per-cell visit counters and parent links), the
//! persisted [`GridRecord`] format, and the structural error types.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod record;

pub use cell::CellKind;
pub use error::{EditError, GridError, RecordError};
pub use geom::{Point, Range};
pub use grid::{GridModel, NO_PARENT};
pub use record::{DEFAULT_NODE_SIZE, GridRecord, load_grid, save_grid};
