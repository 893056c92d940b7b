use pathviz_core::{GridModel, Point};

use crate::frontier::OpenList;
use crate::path::traced_path;
use crate::search::Step;
use crate::traits::AstarPather;

/// A* search keyed on `f = g + h`.
///
/// A cell is closed the first time it is expanded and never relaxed again,
/// so the result is optimal only when the pather's estimate is admissible
/// and consistent. With any other estimate the search still terminates and
/// returns a valid, possibly longer, path.
#[derive(Debug)]
pub struct AStar<P> {
    pather: P,
    goal: Point,
    open: OpenList,
    g: Vec<f64>,
    closed: Vec<bool>,
    nbuf: Vec<Point>,
}

impl<P: AstarPather> AStar<P> {
    pub fn new(grid: &mut GridModel, pather: P) -> Self {
        let start = grid.start();
        let goal = grid.goal();
        let mut g = vec![f64::INFINITY; grid.len()];
        let mut open = OpenList::default();
        if let Some(si) = grid.idx(start) {
            g[si] = 0.0;
            open.push(si, pather.estimate(start, goal));
            grid.touch(start);
        }
        Self {
            pather,
            goal,
            open,
            closed: vec![false; g.len()],
            g,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Pop the open cell with the lowest `f`, close it and relax its
    /// neighbors.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        let ci = loop {
            let Some(node) = self.open.pop() else {
                return Step::Exhausted;
            };
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
                self.open.push(ni, ng + self.pather.estimate(np, self.goal));
            }
        }
        log::trace!("astar: closed {cp} at g={cg:.3}, {} open", self.open.len());
        Step::Expanded(cp)
    }
}
