use pathviz_core::{GridModel, Point};

use crate::path::traced_path;
use crate::search::Step;
use crate::traits::Pather;

/// Stack-driven depth-first search. Finds a path if one exists, with no
/// guarantee on its length.
///
/// A cell is discovered at most once: its parent is set the first time a
/// neighbor sees it, and it is pushed only then.
#[derive(Debug)]
pub struct DepthFirst<P> {
    pather: P,
    goal: Point,
    stack: Vec<usize>,
    discovered: Vec<bool>,
    nbuf: Vec<Point>,
}

impl<P: Pather> DepthFirst<P> {
    pub fn new(grid: &mut GridModel, pather: P) -> Self {
        let start = grid.start();
        let mut discovered = vec![false; grid.len()];
        let mut stack = Vec::new();
        if let Some(si) = grid.idx(start) {
            discovered[si] = true;
            stack.push(si);
            grid.touch(start);
        }
        Self {
            pather,
            goal: grid.goal(),
            stack,
            discovered,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Pop one cell and push its undiscovered neighbors.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        let Some(ci) = self.stack.pop() else {
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
                self.stack.push(ni);
            }
            grid.touch(np);
        }
        log::trace!("dfs: expanded {cp}, {} stacked", self.stack.len());
        Step::Expanded(cp)
    }
}
