use std::collections::VecDeque;

use pathviz_core::{GridModel, Point};

use crate::search::Step;
use crate::traits::AstarPather;

// Slack on the bound comparison so that equal `f` values reached through
// differently rounded sums of diagonal costs are not pruned.
const BOUND_EPSILON: f64 = 1e-9;

/// Iterative-deepening A*.
///
/// Each iteration is a depth-first search that prunes any cell whose
/// `f = g + h` exceeds the current threshold. When an iteration fails the
/// threshold becomes the smallest pruned `f`, and the search starts again
/// from the start cell. Memory is linear in the path length.
///
/// The recursion is kept on an explicit stack of frames so that a single
/// [`step`](Self::step) enters exactly one cell.
///
/// Work still grows exponentially with the open area around a walled
/// route, but an unreachable goal is caught by a flood fill up front and
/// ends the run on its first step.
#[derive(Debug)]
pub struct IdaStar<P> {
    pather: P,
    start: Point,
    goal: Point,
    threshold: f64,
    // Completed, unsuccessful iterations.
    iteration: u32,
    frames: Vec<Frame>,
    on_path: Vec<bool>,
    unreachable: bool,
    pending: Option<(Point, f64)>,
    // Smallest pruned f reported to the root in this iteration.
    root_min: f64,
    nbuf: Vec<Point>,
}

#[derive(Debug)]
struct Frame {
    p: Point,
    g: f64,
    // Neighbors with their step cost, cheapest `cost + h` first.
    succ: Vec<(Point, f64)>,
    next: usize,
    min: f64,
}

impl<P: AstarPather> IdaStar<P> {
    pub fn new(grid: &mut GridModel, pather: P) -> Self {
        let start = grid.start();
        let goal = grid.goal();
        grid.touch(start);
        let unreachable = !reachable(grid, &pather, start, goal);
        if unreachable {
            log::debug!("idastar: {goal} cannot be reached from {start}");
        }
        Self {
            threshold: pather.estimate(start, goal),
            unreachable,
            pather,
            start,
            goal,
            iteration: 0,
            frames: Vec::new(),
            on_path: vec![false; grid.len()],
            pending: Some((start, 0.0)),
            root_min: f64::INFINITY,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Enter one cell: either expand it or prune it against the threshold.
    pub(crate) fn step(&mut self, grid: &mut GridModel) -> Step {
        if self.unreachable {
            return Step::Exhausted;
        }
        loop {
            if let Some((p, g)) = self.pending.take() {
                return self.enter(grid, p, g);
            }
            let Some(top) = self.frames.last_mut() else {
                if let Some(step) = self.next_iteration() {
                    return step;
                }
                continue;
            };
            if let Some(&(np, cost)) = top.succ.get(top.next) {
                top.next += 1;
                let (cp, cg) = (top.p, top.g);
                grid.touch(np);
                let Some(ni) = grid.idx(np) else {
                    continue;
                };
                if self.on_path[ni] {
                    continue;
                }
                grid.set_parent(np, Some(cp));
                self.pending = Some((np, cg + cost));
                continue;
            }
            // Every successor tried: return to the caller.
            let Some(done) = self.frames.pop() else {
                continue;
            };
            if let Some(i) = grid.idx(done.p) {
                self.on_path[i] = false;
            }
            if done.p != self.start {
                grid.set_parent(done.p, None);
            }
            self.report(done.min);
        }
    }

    fn enter(&mut self, grid: &mut GridModel, p: Point, g: f64) -> Step {
        let f = g + self.pather.estimate(p, self.goal);
        if f > self.threshold + BOUND_EPSILON {
            if p != self.start {
                grid.set_parent(p, None);
            }
            self.report(f);
            return Step::Pruned(p);
        }
        if p == self.goal {
            let mut path: Vec<Point> = self.frames.iter().map(|fr| fr.p).collect();
            path.push(p);
            return Step::Found(path);
        }

        self.nbuf.clear();
        self.pather.neighbors(grid, p, &mut self.nbuf);
        let mut succ: Vec<(Point, f64, f64)> = self
            .nbuf
            .iter()
            .map(|&np| {
                let cost = self.pather.cost(p, np);
                (np, cost, cost + self.pather.estimate(np, self.goal))
            })
            .collect();
        succ.sort_by(|a, b| a.2.total_cmp(&b.2));
        if let Some(i) = grid.idx(p) {
            self.on_path[i] = true;
        }
        self.frames.push(Frame {
            p,
            g,
            succ: succ.into_iter().map(|(np, cost, _)| (np, cost)).collect(),
            next: 0,
            min: f64::INFINITY,
        });
        log::trace!("idastar: entered {p} at f={f:.3} (bound {:.3})", self.threshold);
        Step::Expanded(p)
    }

    // Pass a pruned `f` up to the innermost open frame.
    fn report(&mut self, f: f64) {
        match self.frames.last_mut() {
            Some(top) => top.min = top.min.min(f),
            None => self.root_min = self.root_min.min(f),
        }
    }

    // The root returned without finding the goal.
    fn next_iteration(&mut self) -> Option<Step> {
        if !self.root_min.is_finite() {
            return Some(Step::Exhausted);
        }
        self.threshold = self.root_min;
        self.root_min = f64::INFINITY;
        self.iteration += 1;
        self.pending = Some((self.start, 0.0));
        log::debug!(
            "idastar: iteration {} raises bound to {:.3}",
            self.iteration,
            self.threshold
        );
        None
    }
}

// Whether `goal` lies in the same component as `start` under the
// pather's moves.
fn reachable<P: AstarPather>(grid: &GridModel, pather: &P, start: Point, goal: Point) -> bool {
    let mut seen = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    let mut nbuf = Vec::with_capacity(8);
    if let Some(i) = grid.idx(start) {
        seen[i] = true;
        queue.push_back(start);
    }
    while let Some(p) = queue.pop_front() {
        if p == goal {
            return true;
        }
        nbuf.clear();
        pather.neighbors(grid, p, &mut nbuf);
        for &np in &nbuf {
            let Some(i) = grid.idx(np) else {
                continue;
            };
            if !seen[i] {
                seen[i] = true;
                queue.push_back(np);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::Range;
    use crate::cost::{Heuristic, path_cost};
    use crate::traits::GridPather;

    fn solve(grid: &mut GridModel, diagonal: bool, h: Heuristic) -> Option<Vec<Point>> {
        let mut ida = IdaStar::new(grid, GridPather::new(diagonal, h));
        loop {
            match ida.step(grid) {
                Step::Found(p) => return Some(p),
                Step::Exhausted => return None,
                _ => {}
            }
        }
    }

    #[test]
    fn open_grid_first_iteration() {
        let mut grid = GridModel::new(4, 4).unwrap();
        let mut ida = IdaStar::new(&mut grid, GridPather::new(true, Heuristic::Octile));
        let path = loop {
            match ida.step(&mut grid) {
                Step::Found(p) => break p,
                Step::Exhausted => panic!("goal is reachable"),
                _ => {}
            }
        };
        assert_eq!(ida.iteration, 0);
        assert_eq!(path.len(), 4);
        for w in path.windows(2) {
            assert_eq!(grid.parent(w[1]), Some(w[0]));
        }
    }

    #[test]
    fn raises_threshold_around_walls() {
        let mut grid = GridModel::from_ascii(
            "sox
             oxo
             oog",
        )
        .unwrap();
        let mut ida = IdaStar::new(&mut grid, GridPather::new(false, Heuristic::Manhattan));
        let start_bound = ida.threshold;
        let path = loop {
            match ida.step(&mut grid) {
                Step::Found(p) => break p,
                Step::Exhausted => panic!("goal is reachable"),
                _ => {}
            }
        };
        assert_eq!(start_bound, 4.0);
        assert_eq!(path_cost(&path), 4.0);
        assert_eq!(ida.iteration, 0);

        // A detour forces a second iteration.
        let mut grid = GridModel::from_ascii(
            "soo
             xxo
             goo",
        )
        .unwrap();
        let mut ida = IdaStar::new(&mut grid, GridPather::new(false, Heuristic::Manhattan));
        let path = loop {
            match ida.step(&mut grid) {
                Step::Found(p) => break p,
                Step::Exhausted => panic!("goal is reachable"),
                _ => {}
            }
        };
        assert_eq!(path.len(), 7);
        assert!(ida.iteration >= 1);
        assert_eq!(ida.threshold, 6.0);
    }

    #[test]
    fn exhausts_when_unreachable() {
        let mut grid = GridModel::from_ascii(
            "soxo
             xxxg",
        )
        .unwrap();
        assert_eq!(solve(&mut grid, true, Heuristic::Manhattan), None);
        // Unwinding clears the links of abandoned cells.
        assert_eq!(grid.parent(Point::new(1, 0)), None);
    }

    #[test]
    fn walled_off_goal_ends_on_the_first_step() {
        let mut grid = GridModel::new(7, 7).unwrap();
        grid.fill_blocked(Range::new(0, 3, 7, 4), true);
        let mut ida = IdaStar::new(&mut grid, GridPather::new(true, Heuristic::Octile));
        assert_eq!(ida.step(&mut grid), Step::Exhausted);
        assert_eq!(ida.step(&mut grid), Step::Exhausted);
        assert_eq!(grid.visits(Point::new(1, 0)), 0);
    }

    #[test]
    fn never_revisits_a_cell_on_its_own_path() {
        let mut grid = GridModel::new(3, 3).unwrap();
        grid.set_blocked(Point::new(1, 1), true).unwrap();
        let path = solve(&mut grid, true, Heuristic::Manhattan).unwrap();
        let mut sorted = path.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), path.len());
    }
}
