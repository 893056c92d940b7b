use pathviz_core::{GridModel, Point};

use crate::frontier::OpenList;
use crate::path::traced_path;
use crate::search::Step;
use crate::traits::WeightedPather;

/// Uniform-cost search over movement costs. The first time the goal is
/// popped its path has minimum total cost.
#[derive(Debug)]
pub struct Dijkstra<P> {
    pather: P,
    goal: Point,
    open: OpenList,
    g: Vec<f64>,
    closed: Vec<bool>,
    nbuf: Vec<Point>,
}

impl<P: WeightedPather> Dijkstra<P> {
    pub fn new(grid: &mut GridModel, pather: P) -> Self {
        let start = grid.start();
        let mut g = vec![f64::INFINITY; grid.len()];
        let mut open = OpenList::default();
        if let Some(si) = grid.idx(start) {
            g[si] = 0.0;
            open.push(si, 0.0);
            grid.touch(start);
        }
        Self {
            pather,
            goal: grid.goal(),
            open,
            closed: vec![false; g.len()],
            g,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Pop the cheapest open cell, close it and relax its neighbors.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        let ci = loop {
            let Some(node) = self.open.pop() else {
                return Step::Exhausted;
            };
            // Superseded entry of an already closed cell.
            if !self.closed[node.idx] {
                break node.idx;
            }
        };
        let cp = grid.point(ci);
        if cp == self.goal {
            return traced_path(grid).map_or(Step::Exhausted, Step::Found);
        }
        self.closed[ci] = true;

        let cg = self.g[ci];
        self.nbuf.clear();
        self.pather.neighbors(grid, cp, &mut self.nbuf);
        for &np in &self.nbuf {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            grid.touch(np);
            if self.closed[ni] {
                continue;
            }
            let ng = cg + self.pather.cost(cp, np);
            if ng < self.g[ni] {
                self.g[ni] = ng;
                grid.set_parent(np, Some(cp));
                self.open.push(ni, ng);
            }
        }
        log::trace!("dijkstra: closed {cp} at {cg:.3}, {} open", self.open.len());
        Step::Expanded(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{Heuristic, path_cost};
    use crate::traits::GridPather;

    fn solve(grid: &mut GridModel, diagonal: bool) -> Option<Vec<Point>> {
        let mut d = Dijkstra::new(grid, GridPather::new(diagonal, Heuristic::Manhattan));
        loop {
            match d.step(grid) {
                Step::Found(p) => return Some(p),
                Step::Exhausted => return None,
                _ => {}
            }
        }
    }

    #[test]
    fn open_grid_cost() {
        let mut grid = GridModel::new(5, 3).unwrap();
        let path = solve(&mut grid, true).unwrap();
        // Two diagonal moves and two straight ones.
        let want = 2.0 * std::f64::consts::SQRT_2 + 2.0;
        assert!((path_cost(&path) - want).abs() < 1e-9);
    }

    #[test]
    fn routes_around_a_block() {
        let mut grid = GridModel::from_ascii(
            "sooo
             oxxo
             oxxo
             ooog",
        )
        .unwrap();
        let path = solve(&mut grid, false).unwrap();
        assert!((path_cost(&path) - 6.0).abs() < 1e-9);
        grid.reset_search();
        let path = solve(&mut grid, true).unwrap();
        assert!((path_cost(&path) - (4.0 + std::f64::consts::SQRT_2)).abs() < 1e-9);
    }

    #[test]
    fn closed_cells_are_never_reopened() {
        let mut grid = GridModel::new(4, 4).unwrap();
        let mut d = Dijkstra::new(&mut grid, GridPather::new(true, Heuristic::Manhattan));
        let mut expanded = Vec::new();
        loop {
            match d.step(&mut grid) {
                Step::Expanded(p) => expanded.push(p),
                Step::Found(_) => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        let mut dedup = expanded.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), expanded.len());
    }

    #[test]
    fn walled_off_goal() {
        let mut grid = GridModel::from_ascii(
            "soxo
             ooxg",
        )
        .unwrap();
        assert_eq!(solve(&mut grid, true), None);
    }
}
