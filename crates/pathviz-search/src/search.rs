//! The common search state machine and algorithm selection.

use std::fmt;
use std::str::FromStr;

use pathviz_core::{GridError, GridModel, Point};

use crate::astar::AStar;
use crate::beam::BeamSearch;
use crate::bfs::BreadthFirst;
use crate::cost::Heuristic;
use crate::dfs::DepthFirst;
use crate::dijkstra::Dijkstra;
use crate::idastar::IdaStar;
use crate::path::Path;
use crate::task::Context;
use crate::traits::GridPather;

/// Outcome of a single engine step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// One cell was expanded.
    Expanded(Point),
    /// A whole beam was expanded.
    Round(Vec<Point>),
    /// A cell was entered and cut off by a cost bound.
    Pruned(Point),
    Found(Vec<Point>),
    Exhausted,
}

/// The search algorithms on offer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    #[default]
    DepthFirst,
    BreadthFirst,
    Dijkstra,
    AStar,
    BeamSearch,
    IdaStar,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::DepthFirst,
        Algorithm::BreadthFirst,
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::BeamSearch,
        Algorithm::IdaStar,
    ];

    /// Short identifier accepted by [`FromStr`].
    pub const fn id(self) -> &'static str {
        match self {
            Self::DepthFirst => "dfs",
            Self::BreadthFirst => "bfs",
            Self::Dijkstra => "dijkstra",
            Self::AStar => "astar",
            Self::BeamSearch => "beam",
            Self::IdaStar => "idastar",
        }
    }

    /// Whether the algorithm consults [`SearchOptions::heuristic`].
    pub const fn uses_heuristic(self) -> bool {
        matches!(self, Self::AStar | Self::BeamSearch | Self::IdaStar)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DepthFirst => "Depth First Search",
            Self::BreadthFirst => "Breadth First Search",
            Self::Dijkstra => "Dijkstra's",
            Self::AStar => "Astar",
            Self::BeamSearch => "Beam Search",
            Self::IdaStar => "IDAStar",
        })
    }
}

/// Returned when parsing an unknown algorithm identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm {0:?}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the short identifier or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s) || a.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Beam width used with diagonal moves unless overridden.
pub const DIAGONAL_BEAM_WIDTH: usize = 8;

/// Beam width used with 4-way moves unless overridden.
pub const CARDINAL_BEAM_WIDTH: usize = 4;

/// Settings for one search run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SearchOptions {
    pub algorithm: Algorithm,
    /// Allow the four diagonal moves.
    pub diagonal: bool,
    /// Estimator for A*, beam search and IDA*. Ignored by the others.
    pub heuristic: Heuristic,
    /// Beam search only: overrides the default width.
    pub beam_width: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            diagonal: true,
            heuristic: Heuristic::default(),
            beam_width: None,
        }
    }
}

impl SearchOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_beam_width(mut self, width: usize) -> Self {
        self.beam_width = Some(width);
        self
    }

    /// The beam width a search with these options would use.
    pub fn effective_beam_width(&self) -> usize {
        let default = if self.diagonal {
            DIAGONAL_BEAM_WIDTH
        } else {
            CARDINAL_BEAM_WIDTH
        };
        self.beam_width.unwrap_or(default).max(1)
    }

    fn pather(&self) -> GridPather {
        GridPather::new(self.diagonal, self.heuristic)
    }
}

/// Where a search is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Ready,
    Running,
    Succeeded(Path),
    /// The goal cannot be reached (or, for beam search, was not found).
    Failed,
    Cancelled,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed | Self::Cancelled)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Succeeded(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum Engine {
    DepthFirst(DepthFirst<GridPather>),
    BreadthFirst(BreadthFirst<GridPather>),
    Dijkstra(Dijkstra<GridPather>),
    AStar(AStar<GridPather>),
    BeamSearch(BeamSearch<GridPather>),
    IdaStar(IdaStar<GridPather>),
}

impl Engine {
    fn new(grid: &mut GridModel, options: &SearchOptions) -> Self {
        let pather = options.pather();
        match options.algorithm {
            Algorithm::DepthFirst => Self::DepthFirst(DepthFirst::new(grid, pather)),
            Algorithm::BreadthFirst => Self::BreadthFirst(BreadthFirst::new(grid, pather)),
            Algorithm::Dijkstra => Self::Dijkstra(Dijkstra::new(grid, pather)),
            Algorithm::AStar => Self::AStar(AStar::new(grid, pather)),
            Algorithm::BeamSearch => Self::BeamSearch(BeamSearch::new(
                grid,
                pather,
                options.effective_beam_width(),
            )),
            Algorithm::IdaStar => Self::IdaStar(IdaStar::new(grid, pather)),
        }
    }

    fn step(&mut self, grid: &mut GridModel) -> Step {
        match self {
            Self::DepthFirst(e) => e.step(grid),
            Self::BreadthFirst(e) => e.step(grid),
            Self::Dijkstra(e) => e.step(grid),
            Self::AStar(e) => e.step(grid),
            Self::BeamSearch(e) => e.step(grid),
            Self::IdaStar(e) => e.step(grid),
        }
    }
}

/// One run of one algorithm over a [`GridModel`].
///
/// The search does not own the grid: every call to [`step`](Self::step)
/// borrows it, advances by one unit of work and records visit counters and
/// parent links on it. The same grid must be passed for the whole run and
/// must not be edited in between.
///
/// ```
/// use pathviz_core::GridModel;
/// use pathviz_search::{Algorithm, Search, SearchOptions, SearchStatus};
///
/// let mut grid = GridModel::new(4, 3).unwrap();
/// let mut search = Search::new(&mut grid, SearchOptions::new(Algorithm::AStar)).unwrap();
/// while !search.step(&mut grid).is_terminal() {}
/// let path = search.status().path().unwrap();
/// assert_eq!(path.len(), 4);
/// ```
#[derive(Debug)]
pub struct Search {
    options: SearchOptions,
    engine: Engine,
    status: SearchStatus,
    steps: usize,
    cells: usize,
    expanded: Vec<Point>,
}

impl Search {
    /// Validate `grid`, clear its visit counters and parent links, and
    /// prepare a run. Nothing on the grid changes if validation fails.
    pub fn new(grid: &mut GridModel, options: SearchOptions) -> Result<Self, GridError> {
        grid.validate()?;
        grid.reset_search();
        log::debug!(
            "starting {} on {}x{} grid ({} -> {})",
            options.algorithm,
            grid.width(),
            grid.height(),
            grid.start(),
            grid.goal()
        );
        Ok(Self {
            engine: Engine::new(grid, &options),
            options,
            status: SearchStatus::Ready,
            steps: 0,
            cells: grid.len(),
            expanded: Vec::new(),
        })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Cells entered by the last step: one cell, or a whole beam for beam
    /// search. Empty before the first step and after the final one.
    pub fn last_expanded(&self) -> &[Point] {
        &self.expanded
    }

    /// Advance by one step. Once the search is terminal this does nothing.
    pub fn step(&mut self, grid: &mut GridModel) -> &SearchStatus {
        if self.status.is_terminal() {
            return &self.status;
        }
        debug_assert_eq!(grid.len(), self.cells, "grid replaced during a search");
        self.status = SearchStatus::Running;
        self.steps += 1;
        self.expanded.clear();
        match self.engine.step(grid) {
            Step::Expanded(p) | Step::Pruned(p) => self.expanded.push(p),
            Step::Round(cells) => self.expanded = cells,
            Step::Found(points) => {
                let path = Path::new(points);
                log::debug!(
                    "{} found a path of {} cells (cost {:.3}) in {} steps",
                    self.options.algorithm,
                    path.len(),
                    path.cost(),
                    self.steps
                );
                self.status = SearchStatus::Succeeded(path);
            }
            Step::Exhausted => {
                log::debug!("{} found no path in {} steps", self.options.algorithm, self.steps);
                self.status = SearchStatus::Failed;
            }
        }
        &self.status
    }

    /// Stop a search that has not finished yet.
    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            log::debug!("{} cancelled after {} steps", self.options.algorithm, self.steps);
            self.status = SearchStatus::Cancelled;
        }
    }

    /// Step until the search is terminal or `ctx` is cancelled.
    pub fn run(&mut self, grid: &mut GridModel, ctx: &Context) -> &SearchStatus {
        self.run_with(grid, ctx, |_| {});
        &self.status
    }

    /// Like [`run`](Self::run), calling `on_step` after every step.
    pub fn run_with<F>(
        &mut self,
        grid: &mut GridModel,
        ctx: &Context,
        mut on_step: F,
    ) -> &SearchStatus
    where
        F: FnMut(&Search),
    {
        while !self.status.is_terminal() {
            if ctx.is_done() {
                self.cancel();
                break;
            }
            self.step(grid);
            on_step(self);
        }
        &self.status
    }

    pub fn into_status(self) -> SearchStatus {
        self.status
    }
}

/// Run a search to completion on the calling thread.
///
/// Returns `Ok(None)` when no path was found.
pub fn find_path(grid: &mut GridModel, options: SearchOptions) -> Result<Option<Path>, GridError> {
    let mut search = Search::new(grid, options)?;
    search.run(grid, &Context::new());
    match search.into_status() {
        SearchStatus::Succeeded(path) => Ok(Some(path)),
        _ => Ok(None),
    }
}
