use pathviz_core::{GridModel, Point};

use crate::cost::{Heuristic, movement_cost};
use crate::neighbors::NeighborPolicy;

/// Minimal search interface: neighbor enumeration.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, grid: &GridModel, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> f64;
}

/// Pather with a remaining-distance estimate.
pub trait AstarPather: WeightedPather {
    /// Estimate of the cost from `from` to `to`. A* and IDA* are only
    /// optimal when this never overestimates.
    fn estimate(&self, from: Point, to: Point) -> f64;
}

/// The standard pather: a [`NeighborPolicy`], the step costs of
/// [`movement_cost`], and one [`Heuristic`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridPather {
    pub policy: NeighborPolicy,
    pub heuristic: Heuristic,
}

impl GridPather {
    pub const fn new(diagonal: bool, heuristic: Heuristic) -> Self {
        Self {
            policy: NeighborPolicy::new(diagonal),
            heuristic,
        }
    }
}

impl Pather for GridPather {
    #[inline]
    fn neighbors(&self, grid: &GridModel, p: Point, buf: &mut Vec<Point>) {
        self.policy.neighbors(grid, p, buf);
    }
}

impl WeightedPather for GridPather {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        movement_cost(from, to)
    }
}

impl AstarPather for GridPather {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> f64 {
        self.heuristic.estimate(from, to)
    }
}
