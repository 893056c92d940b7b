use pathviz_core::{CellKind, GridModel};
use proptest::prelude::*;

use crate::cost::Heuristic;
use crate::search::{Algorithm, SearchOptions, find_path};
use crate::Path;

// Start in the top-left corner, goal in the bottom-right, walls elsewhere
// with probability `density`.
fn grid_strategy(max_side: i32, density: f64) -> impl Strategy<Value = GridModel> {
    (2..=max_side, 2..=max_side).prop_flat_map(move |(w, h)| {
        let n = (w * h) as usize;
        prop::collection::vec(prop::bool::weighted(density), n).prop_map(move |walls| {
            let mut kinds: Vec<CellKind> = walls
                .into_iter()
                .map(|b| if b { CellKind::Blocked } else { CellKind::Empty })
                .collect();
            kinds[0] = CellKind::Start;
            kinds[n - 1] = CellKind::Goal;
            GridModel::from_layout(w, h, kinds).unwrap()
        })
    })
}

fn run(
    grid: &GridModel,
    algorithm: Algorithm,
    diagonal: bool,
    heuristic: Heuristic,
) -> (Option<Path>, GridModel) {
    let mut g = grid.clone();
    let options = SearchOptions {
        algorithm,
        diagonal,
        heuristic,
        beam_width: None,
    };
    let path = find_path(&mut g, options).unwrap();
    (path, g)
}

fn admissible(diagonal: bool) -> Heuristic {
    if diagonal {
        Heuristic::Octile
    } else {
        Heuristic::Manhattan
    }
}

proptest! {
    /// Every returned path is walkable and every parent chain ends.
    #[test]
    fn prop_paths_are_valid(grid in grid_strategy(7, 0.3), diagonal in any::<bool>()) {
        for algorithm in Algorithm::ALL {
            if algorithm == Algorithm::IdaStar {
                continue;
            }
            let (path, after) = run(&grid, algorithm, diagonal, admissible(diagonal));
            if let Some(path) = path {
                let pts = path.points();
                prop_assert_eq!(pts.first(), Some(&grid.start()));
                prop_assert_eq!(pts.last(), Some(&grid.goal()));
                for w in pts.windows(2) {
                    prop_assert!(grid.is_passable(w[1]));
                    let (a, b) = (w[0], w[1]);
                    let step_ok = a.is_adjacent(b) && (diagonal || !a.is_diagonal_to(b));
                    prop_assert!(step_ok, "{} made an illegal move {} -> {}", algorithm, a, b);
                }
            }
            for p in after.bounds() {
                prop_assert!(after.trace(p).is_some());
            }
        }
    }

    /// The complete algorithms agree on whether the goal is reachable, and
    /// breadth-first never uses more moves.
    #[test]
    fn prop_bfs_fewest_hops(grid in grid_strategy(7, 0.3), diagonal in any::<bool>()) {
        let (bfs, _) = run(&grid, Algorithm::BreadthFirst, diagonal, admissible(diagonal));
        let others = [
            Algorithm::DepthFirst,
            Algorithm::Dijkstra,
            Algorithm::AStar,
            Algorithm::BeamSearch,
        ];
        for algorithm in others {
            let (other, _) = run(&grid, algorithm, diagonal, admissible(diagonal));
            match (&bfs, &other) {
                (Some(b), Some(o)) => prop_assert!(b.hops() <= o.hops(), "{}", algorithm),
                (None, None) => {}
                (Some(_), None) => prop_assert_eq!(algorithm, Algorithm::BeamSearch),
                (None, Some(_)) => prop_assert!(false, "{} found a path bfs missed", algorithm),
            }
        }
    }

    /// With an admissible, consistent estimate A* is as cheap as Dijkstra.
    #[test]
    fn prop_astar_matches_dijkstra(grid in grid_strategy(8, 0.3), diagonal in any::<bool>()) {
        let h = admissible(diagonal);
        let (d, _) = run(&grid, Algorithm::Dijkstra, diagonal, h);
        let (a, _) = run(&grid, Algorithm::AStar, diagonal, h);
        match (d, a) {
            (Some(d), Some(a)) => prop_assert!((d.cost() - a.cost()).abs() < 1e-9),
            (d, a) => prop_assert_eq!(d.is_none(), a.is_none()),
        }
    }

    /// IDA* finds paths exactly as cheap as A*. Kept to small grids: its
    /// work grows exponentially with the open area it has to search.
    #[test]
    fn prop_idastar_matches_astar(grid in grid_strategy(4, 0.25), diagonal in any::<bool>()) {
        let h = admissible(diagonal);
        let (a, _) = run(&grid, Algorithm::AStar, diagonal, h);
        let (i, _) = run(&grid, Algorithm::IdaStar, diagonal, h);
        match (a, i) {
            (Some(a), Some(i)) => prop_assert!((a.cost() - i.cost()).abs() < 1e-9),
            (a, i) => prop_assert_eq!(a.is_none(), i.is_none()),
        }
    }
}
