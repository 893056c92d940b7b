use pathviz_core::{GridModel, Point};

use crate::path::traced_path;
use crate::search::Step;
use crate::traits::AstarPather;

/// Beam search: a breadth-first sweep that keeps only the `width` most
/// promising cells of each round, ranked by the pather's estimate.
///
/// Cells are never revisited once they entered a beam. The search is not
/// complete: it can fail on grids where a path exists.
#[derive(Debug)]
pub struct BeamSearch<P> {
    pather: P,
    goal: Point,
    width: usize,
    beam: Vec<usize>,
    seen: Vec<bool>,
    pooled: Vec<bool>,
    pool: Vec<Candidate>,
    nbuf: Vec<Point>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    idx: usize,
    h: f64,
    parent: Point,
}

impl<P: AstarPather> BeamSearch<P> {
    /// A `width` of zero is treated as one.
    pub fn new(grid: &mut GridModel, pather: P, width: usize) -> Self {
        let start = grid.start();
        let mut seen = vec![false; grid.len()];
        let mut beam = Vec::new();
        if let Some(si) = grid.idx(start) {
            seen[si] = true;
            beam.push(si);
            grid.touch(start);
        }
        Self {
            pather,
            goal: grid.goal(),
            width: width.max(1),
            beam,
            pooled: vec![false; seen.len()],
            seen,
            pool: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Expand the whole current beam, then select the next one.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        if self.beam.is_empty() {
            return Step::Exhausted;
        }
        let mut expanded = Vec::with_capacity(self.beam.len());
        for &ci in &self.beam {
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
                grid.touch(np);
                if self.seen[ni] || self.pooled[ni] {
                    continue;
                }
                self.pooled[ni] = true;
                self.pool.push(Candidate {
                    idx: ni,
                    h: self.pather.estimate(np, self.goal),
                    parent: cp,
                });
            }
            expanded.push(cp);
        }

        // Stable: among equal estimates the first pooled wins.
        self.pool.sort_by(|a, b| a.h.total_cmp(&b.h));
        self.beam.clear();
        for c in self.pool.drain(..) {
            self.pooled[c.idx] = false;
            if self.beam.len() < self.width {
                self.seen[c.idx] = true;
                grid.set_parent(grid.point(c.idx), Some(c.parent));
                self.beam.push(c.idx);
            }
        }
        log::trace!("beam: expanded {}, next beam {}", expanded.len(), self.beam.len());
        Step::Round(expanded)
    }
}
