use pathviz_core::{CellKind, GridError, GridModel, Point};
use rand::Rng;

// Lattice steps: north, south, east, west.
const DIRS: [Point; 4] = [
    Point::new(0, -2),
    Point::new(0, 2),
    Point::new(2, 0),
    Point::new(-2, 0),
];

/// The first lattice cell, which becomes the start.
pub const MAZE_START: Point = Point::new(1, 1);

/// Errors from maze generation. The grid is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("grid {width}x{height} is too small for a maze")]
    TooSmall { width: i32, height: i32 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Randomized recursive-backtracker maze generator.
///
/// Passages run between the cells with odd coordinates, keeping a wall ring
/// around the border. Every carved cell is reachable from every other one
/// through exactly one route under 4-way moves.
#[derive(Debug)]
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Rewrite the layout of `grid` with a fresh maze.
    ///
    /// The start goes to (1, 1) and the goal to the last cell the carver
    /// reached for the first time. Visit counters and parent links are
    /// cleared.
    pub fn carve(&mut self, grid: &mut GridModel) -> Result<(), MazeError> {
        let (w, h) = (grid.width(), grid.height());
        // Lattice cells per axis.
        let (lw, lh) = ((w - 1) / 2, (h - 1) / 2);
        if lw < 1 || lh < 1 || lw * lh < 2 {
            return Err(MazeError::TooSmall {
                width: w,
                height: h,
            });
        }

        let inside = |p: Point| p.x >= 1 && p.y >= 1 && p.x < w - 1 && p.y < h - 1;
        let flat = |p: Point| p.y as usize * w as usize + p.x as usize;

        let mut kinds = vec![CellKind::Blocked; grid.len()];
        let mut visited = vec![false; grid.len()];
        let mut stack = vec![MAZE_START];
        visited[flat(MAZE_START)] = true;
        kinds[flat(MAZE_START)] = CellKind::Empty;
        let mut last = MAZE_START;
        let mut open = Vec::with_capacity(DIRS.len());

        while let Some(&cur) = stack.last() {
            open.clear();
            open.extend(
                DIRS.iter()
                    .map(|&d| cur + d)
                    .filter(|&n| inside(n) && !visited[flat(n)]),
            );
            if open.is_empty() {
                stack.pop();
                continue;
            }
            let next = open[self.rng.random_range(0..open.len())];
            let wall = Point::new((cur.x + next.x) / 2, (cur.y + next.y) / 2);
            kinds[flat(wall)] = CellKind::Empty;
            kinds[flat(next)] = CellKind::Empty;
            visited[flat(next)] = true;
            last = next;
            stack.push(next);
        }

        kinds[flat(MAZE_START)] = CellKind::Start;
        kinds[flat(last)] = CellKind::Goal;
        grid.replace_layout(kinds)?;
        log::info!("carved {w}x{h} maze, goal at {last}");
        Ok(())
    }
}

/// Carve a maze into `grid` using the thread-local RNG.
pub fn generate_maze(grid: &mut GridModel) -> Result<(), MazeError> {
    MazeGen::new(rand::rng()).carve(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_search::{Algorithm, SearchOptions, find_path};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> MazeGen<StdRng> {
        MazeGen::new(StdRng::seed_from_u64(seed))
    }

    fn open_cells(grid: &GridModel) -> Vec<Point> {
        grid.bounds()
            .into_iter()
            .filter(|&p| grid.is_passable(p))
            .collect()
    }

    // Flood fill under 4-way moves.
    fn reachable(grid: &GridModel, from: Point) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut stack = vec![from];
        let mut n = 0;
        while let Some(p) = stack.pop() {
            let Some(i) = grid.idx(p) else { continue };
            if seen[i] || !grid.is_passable(p) {
                continue;
            }
            seen[i] = true;
            n += 1;
            for d in [Point::new(1, 0), Point::new(-1, 0), Point::new(0, 1), Point::new(0, -1)] {
                stack.push(p + d);
            }
        }
        n
    }

    #[test]
    fn carves_a_perfect_maze() {
        for seed in 0..20 {
            let mut grid = GridModel::new(9, 9).unwrap();
            seeded(seed).carve(&mut grid).unwrap();
            let cells = open_cells(&grid);
            // 4×4 lattice cells plus one wall cell per tree edge.
            assert_eq!(cells.len(), 16 + 15, "seed {seed}");
            assert_eq!(reachable(&grid, grid.start()), cells.len(), "seed {seed}");
            let edges: usize = cells
                .iter()
                .map(|&p| {
                    [Point::new(1, 0), Point::new(0, 1)]
                        .into_iter()
                        .filter(|&d| grid.is_passable(p + d))
                        .count()
                })
                .sum();
            // Connected with |E| = |V| - 1: a spanning tree.
            assert_eq!(edges, cells.len() - 1, "seed {seed}");
        }
    }

    #[test]
    fn border_stays_walled() {
        let mut grid = GridModel::new(11, 7).unwrap();
        seeded(7).carve(&mut grid).unwrap();
        for p in grid.bounds() {
            if p.x == 0 || p.y == 0 || p.x == 10 || p.y == 6 {
                assert_eq!(grid.kind(p), Some(CellKind::Blocked), "{p}");
            }
        }
        assert_eq!(grid.start(), MAZE_START);
        assert_ne!(grid.goal(), MAZE_START);
        assert_eq!(grid.goal().x % 2, 1);
        assert_eq!(grid.goal().y % 2, 1);
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = GridModel::new(15, 15).unwrap();
        let mut b = GridModel::new(15, 15).unwrap();
        seeded(42).carve(&mut a).unwrap();
        seeded(42).carve(&mut b).unwrap();
        assert_eq!(a.kinds(), b.kinds());
    }

    #[test]
    fn clears_search_bookkeeping() {
        let mut grid = GridModel::new(9, 9).unwrap();
        find_path(&mut grid, SearchOptions::new(Algorithm::BreadthFirst)).unwrap();
        assert!(grid.visit_counts().iter().any(|&v| v > 0));
        seeded(1).carve(&mut grid).unwrap();
        assert!(grid.visit_counts().iter().all(|&v| v == 0));
        assert!(grid.bounds().into_iter().all(|p| grid.parent(p).is_none()));
    }

    #[test]
    fn every_algorithm_solves_a_maze() {
        // Scenario: 9×9 maze, 4-way, Manhattan.
        let mut grid = GridModel::new(9, 9).unwrap();
        seeded(3).carve(&mut grid).unwrap();
        let mut bfs_hops = None;
        for algorithm in Algorithm::ALL {
            if algorithm == Algorithm::BeamSearch {
                continue;
            }
            let options = SearchOptions::new(algorithm).with_diagonal(false);
            let path = find_path(&mut grid, options).unwrap().unwrap();
            // In a perfect maze there is only one simple path.
            let hops = *bfs_hops.get_or_insert(path.hops());
            assert_eq!(path.hops(), hops, "{algorithm}");
        }
    }

    #[test]
    fn too_small_leaves_grid_untouched() {
        for (w, h) in [(2, 5), (3, 3), (4, 4), (5, 2)] {
            let mut grid = GridModel::new(w, h).unwrap();
            let before = grid.clone();
            assert_eq!(
                seeded(0).carve(&mut grid),
                Err(MazeError::TooSmall {
                    width: w,
                    height: h
                })
            );
            assert_eq!(grid, before);
        }
        let mut grid = GridModel::new(5, 3).unwrap();
        assert!(generate_maze(&mut grid).is_ok());
        assert_eq!(grid.goal(), Point::new(3, 1));
    }
}
