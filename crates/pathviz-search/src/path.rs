use pathviz_core::{GridModel, Point};

use crate::cost::path_cost;

/// A route from the start cell to the goal cell, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub(crate) fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The cells of the path, start first.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of cells, endpoints included.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a path produced by a search.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of moves (`len() - 1`).
    #[inline]
    pub fn hops(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Total movement cost.
    pub fn cost(&self) -> f64 {
        path_cost(&self.points)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(&p)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Rebuild the start-to-goal route from the parent links left on `grid`.
/// Returns `None` if the goal's chain does not lead back to the start.
pub(crate) fn traced_path(grid: &GridModel) -> Option<Vec<Point>> {
    let points = grid.trace(grid.goal())?;
    if points.first() != Some(&grid.start()) {
        log::error!(
            "parent chain from {} ends at {:?}, not at start {}",
            grid.goal(),
            points.first(),
            grid.start()
        );
        return None;
    }
    Some(points)
}
