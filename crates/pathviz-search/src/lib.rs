//! Steppable search algorithms over a [`pathviz_core::GridModel`].
//!
//! Six algorithms share one state machine, [`Search`]:
//!
//! | Algorithm | Frontier | Result |
//! |---|---|---|
//! | [`Algorithm::DepthFirst`] | stack | any path |
//! | [`Algorithm::BreadthFirst`] | queue | fewest moves |
//! | [`Algorithm::Dijkstra`] | heap on `g` | cheapest |
//! | [`Algorithm::AStar`] | heap on `g + h` | cheapest if `h` is admissible |
//! | [`Algorithm::BeamSearch`] | best `width` cells per round | any path, may miss one |
//! | [`Algorithm::IdaStar`] | depth-first under an `f` bound | cheapest if `h` is admissible |
//!
//! A search advances one step at a time so that hosts can animate it, or
//! runs to completion with [`Search::run`] or on a worker thread with
//! [`start_search`]. While running it records per-cell visit counters and
//! parent links on the grid for display.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | DFS, BFS |
//! | [`WeightedPather`] : [`Pather`] | Dijkstra |
//! | [`AstarPather`] : [`WeightedPather`] | A*, beam search, IDA* |

mod astar;
mod beam;
mod bfs;
mod cost;
mod dfs;
mod dijkstra;
mod frontier;
mod idastar;
mod neighbors;
mod path;
mod search;
mod task;
mod traits;

#[cfg(test)]
mod proptests;

pub use cost::{DIAGONAL_COST, Heuristic, STRAIGHT_COST, UnknownHeuristic, movement_cost, path_cost};
pub use neighbors::NeighborPolicy;
pub use path::Path;
pub use search::{
    Algorithm, CARDINAL_BEAM_WIDTH, DIAGONAL_BEAM_WIDTH, Search, SearchOptions, SearchStatus,
    UnknownAlgorithm, find_path,
};
pub use task::{
    Context, DEFAULT_HISTORY, Poll, SearchHandle, TaskConfig, TaskError, start_search,
    start_search_with,
};
pub use traits::{AstarPather, GridPather, Pather, WeightedPather};
