use std::collections::VecDeque;

use pathviz_core::{GridModel, Point};

use crate::path::traced_path;
use crate::search::Step;
use crate::traits::Pather;

/// Queue-driven breadth-first search. Every move counts as one hop, so the
/// path found has the fewest cells; among equally short paths the one
/// discovered first wins.
#[derive(Debug)]
pub struct BreadthFirst<P> {
    pather: P,
    goal: Point,
    queue: VecDeque<usize>,
    discovered: Vec<bool>,
    nbuf: Vec<Point>,
}

impl<P: Pather> BreadthFirst<P> {
    pub fn new(grid: &mut GridModel, pather: P) -> Self {
        let start = grid.start();
        let mut discovered = vec![false; grid.len()];
        let mut queue = VecDeque::new();
        if let Some(si) = grid.idx(start) {
            discovered[si] = true;
            queue.push_back(si);
            grid.touch(start);
        }
        Self {
            pather,
            goal: grid.goal(),
            queue,
            discovered,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Dequeue one cell and enqueue its undiscovered neighbors.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        let Some(ci) = self.queue.pop_front() else {
            return Step::Exhausted;
        };
        let cp = grid.point(ci);
        if cp == self.goal {
            return traced_path(grid).map_or(Step::Exhausted, Step::Found);
        }

        self.nbuf.clear();
        self.pather.neighbors(grid, cp, &mut self.nbuf);
        for &np in &self.nbuf {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            if !self.discovered[ni] {
                self.discovered[ni] = true;
                grid.set_parent(np, Some(cp));
                self.queue.push_back(ni);
            }
            grid.touch(np);
        }
        log::trace!("bfs: expanded {cp}, {} queued", self.queue.len());
        Step::Expanded(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Heuristic;
    use crate::traits::GridPather;

    fn solve(grid: &mut GridModel, diagonal: bool) -> Option<Vec<Point>> {
        let mut bfs = BreadthFirst::new(grid, GridPather::new(diagonal, Heuristic::Manhattan));
        loop {
            match bfs.step(grid) {
                Step::Found(p) => return Some(p),
                Step::Exhausted => return None,
                _ => {}
            }
        }
    }

    #[test]
    fn fewest_hops_around_a_wall() {
        let mut grid = GridModel::from_ascii(
            "ooooo
             oxxxo
             sxgxo
             oxoxo
             ooooo",
        )
        .unwrap();
        // 4-way: the goal pocket only opens downward through (2,3).
        let path = solve(&mut grid, false).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path[path.len() - 2], Point::new(2, 3));
    }

    #[test]
    fn diagonals_shorten_the_route() {
        let mut grid = GridModel::new(6, 3).unwrap();
        let straight = solve(&mut grid, false).unwrap();
        grid.reset_search();
        let diagonal = solve(&mut grid, true).unwrap();
        assert_eq!(straight.len(), 8);
        assert_eq!(diagonal.len(), 6);
    }

    #[test]
    fn unreachable_goal() {
        let mut grid = GridModel::from_ascii(
            "soo
             xxx
             oog",
        )
        .unwrap();
        assert_eq!(solve(&mut grid, true), None);
        // Nothing below the wall was ever touched.
        assert_eq!(grid.visits(Point::new(0, 2)), 0);
        assert_eq!(grid.visits(Point::new(2, 2)), 0);
    }
}
