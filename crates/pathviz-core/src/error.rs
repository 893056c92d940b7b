//! Structural errors: invalid grids, refused edits and malformed records.

use crate::geom::Point;

/// A grid that violates the model invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid: zero-sized grid {width}x{height}")]
    ZeroSize { width: i32, height: i32 },
    #[error("grid: no start cell")]
    MissingStart,
    #[error("grid: no goal cell")]
    MissingGoal,
    #[error("grid: second start cell at {0}")]
    DuplicateStart(Point),
    #[error("grid: second goal cell at {0}")]
    DuplicateGoal(Point),
    #[error("grid: start and goal are both at {0}")]
    StartIsGoal(Point),
    #[error("grid: endpoint {0} is blocked")]
    BlockedEndpoint(Point),
    #[error("grid: {0} is out of bounds")]
    OutOfBounds(Point),
    #[error("grid: layout has {actual} cells, expected {expected}")]
    LayoutSize { expected: usize, actual: usize },
}

/// An edit the grid refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit: {0} is out of bounds")]
    OutOfBounds(Point),
    #[error("edit: {0} holds the start or goal cell")]
    Occupied(Point),
}

/// Persisted grid data that cannot be turned into a [`GridModel`](crate::GridModel).
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record: {actual} columns, gridWidth says {expected}")]
    ColumnCount { expected: usize, actual: usize },
    #[error("record: column {column} has {actual} cells, gridHeight says {expected}")]
    ColumnLength {
        column: usize,
        expected: usize,
        actual: usize,
    },
    #[error("record: row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("record: unknown cell code {code:?} at {pos}")]
    UnknownCode { code: char, pos: Point },
    #[error("record: {0}")]
    InvalidGrid(#[from] GridError),
}
