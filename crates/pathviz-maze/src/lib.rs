//! Maze generation for pathviz grids.
//!
//! [`MazeGen`] carves a perfect maze with a randomized recursive backtracker
//! and commits it to a [`pathviz_core::GridModel`] in one step.

mod maze;

pub use maze::{MAZE_START, MazeError, MazeGen, generate_maze};
