//! The [`GridModel`] type: the cell layout a search runs on.
//!
//! Per-cell state is stored in flat row-major arrays indexed through the
//! grid's [`Range`]: the cell kind, a display-only visit counter, and the
//! parent index of the cell on the current search tree. Parent links are
//! plain indices, never references, so tracing a path can always be bounded.

use std::fmt;

use crate::cell::CellKind;
use crate::error::{EditError, GridError, RecordError};
use crate::geom::{Point, Range};

/// Parent sentinel for cells that are not on the search tree.
pub const NO_PARENT: usize = usize::MAX;

/// A rectangular grid with exactly one start and one goal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    bounds: Range,
    width: usize,
    kinds: Vec<CellKind>,
    visits: Vec<u32>,
    parents: Vec<usize>,
    start: Point,
    goal: Point,
}

impl GridModel {
    /// Create a grid with the default layout: start in the top-left corner,
    /// goal in the bottom-right corner, every other cell empty.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        let bounds = Self::checked_bounds(width, height)?;
        let mut kinds = vec![CellKind::Empty; bounds.len()];
        let (start, goal) = Self::default_endpoints(bounds)?;
        let w = width as usize;
        kinds[start.y as usize * w + start.x as usize] = CellKind::Start;
        kinds[goal.y as usize * w + goal.x as usize] = CellKind::Goal;
        Ok(Self::assemble(bounds, kinds, start, goal))
    }

    /// Create a grid from a row-major layout. The layout must contain exactly
    /// one [`CellKind::Start`] and one [`CellKind::Goal`].
    pub fn from_layout(width: i32, height: i32, kinds: Vec<CellKind>) -> Result<Self, GridError> {
        let bounds = Self::checked_bounds(width, height)?;
        let (start, goal) = Self::scan_endpoints(bounds, &kinds)?;
        Ok(Self::assemble(bounds, kinds, start, goal))
    }

    /// Parse a grid from rows of persisted cell codes (`s`, `g`, `x`, `o`),
    /// one line per row. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(content: &str) -> Result<Self, RecordError> {
        let rows: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut kinds = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(RecordError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, code) in row.chars().enumerate() {
                let kind = CellKind::from_code(code).ok_or(RecordError::UnknownCode {
                    code,
                    pos: Point::new(x as i32, y as i32),
                })?;
                kinds.push(kind);
            }
        }
        Ok(Self::from_layout(width as i32, rows.len() as i32, kinds)?)
    }

    fn checked_bounds(width: i32, height: i32) -> Result<Range, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::ZeroSize { width, height });
        }
        Ok(Range::new(0, 0, width, height))
    }

    fn default_endpoints(bounds: Range) -> Result<(Point, Point), GridError> {
        let start = bounds.min;
        let goal = bounds.max.shift(-1, -1);
        if start == goal {
            return Err(GridError::StartIsGoal(start));
        }
        Ok((start, goal))
    }

    fn scan_endpoints(bounds: Range, kinds: &[CellKind]) -> Result<(Point, Point), GridError> {
        if kinds.len() != bounds.len() {
            return Err(GridError::LayoutSize {
                expected: bounds.len(),
                actual: kinds.len(),
            });
        }
        let mut start = None;
        let mut goal = None;
        for (p, &kind) in bounds.iter().zip(kinds) {
            match kind {
                CellKind::Start if start.is_some() => return Err(GridError::DuplicateStart(p)),
                CellKind::Start => start = Some(p),
                CellKind::Goal if goal.is_some() => return Err(GridError::DuplicateGoal(p)),
                CellKind::Goal => goal = Some(p),
                _ => {}
            }
        }
        let start = start.ok_or(GridError::MissingStart)?;
        let goal = goal.ok_or(GridError::MissingGoal)?;
        Ok((start, goal))
    }

    fn assemble(bounds: Range, kinds: Vec<CellKind>, start: Point, goal: Point) -> Self {
        let len = kinds.len();
        Self {
            bounds,
            width: bounds.width() as usize,
            kinds,
            visits: vec![0; len],
            parents: vec![NO_PARENT; len],
            start,
            goal,
        }
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// The bounding range `[(0, 0), (width, height))`.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always `false`: a valid grid has at least two cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width + p.x as usize)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// The kind of the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn kind(&self, p: Point) -> Option<CellKind> {
        self.idx(p).map(|i| self.kinds[i])
    }

    /// Whether `p` is in bounds and not blocked.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.kind(p).is_some_and(CellKind::is_passable)
    }

    /// Row-major view of every cell kind.
    #[inline]
    pub fn kinds(&self) -> &[CellKind] {
        &self.kinds
    }

    /// Check every structural invariant of the grid.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.bounds.is_empty() {
            return Err(GridError::ZeroSize {
                width: self.width(),
                height: self.height(),
            });
        }
        if self.start == self.goal {
            return Err(GridError::StartIsGoal(self.start));
        }
        for (p, expected) in [(self.start, CellKind::Start), (self.goal, CellKind::Goal)] {
            match self.kind(p) {
                None => return Err(GridError::OutOfBounds(p)),
                Some(CellKind::Blocked) => return Err(GridError::BlockedEndpoint(p)),
                Some(k) if k != expected && expected == CellKind::Start => {
                    return Err(GridError::MissingStart);
                }
                Some(k) if k != expected => return Err(GridError::MissingGoal),
                Some(_) => {}
            }
        }
        let (start, goal) = Self::scan_endpoints(self.bounds, &self.kinds)?;
        debug_assert_eq!((start, goal), (self.start, self.goal));
        Ok(())
    }

    /// Replace the whole layout at once. The new layout is validated first;
    /// on error the grid is left untouched. Search bookkeeping is cleared.
    pub fn replace_layout(&mut self, kinds: Vec<CellKind>) -> Result<(), GridError> {
        let (start, goal) = Self::scan_endpoints(self.bounds, &kinds)?;
        self.kinds = kinds;
        self.start = start;
        self.goal = goal;
        self.reset_search();
        Ok(())
    }

    /// Restore the default layout and clear all search bookkeeping.
    pub fn reset(&mut self) {
        self.kinds.fill(CellKind::Empty);
        // A valid grid always has room for two distinct corners.
        let (start, goal) = (self.bounds.min, self.bounds.max.shift(-1, -1));
        let (si, gi) = (self.flat(start), self.flat(goal));
        self.kinds[si] = CellKind::Start;
        self.kinds[gi] = CellKind::Goal;
        self.start = start;
        self.goal = goal;
        self.reset_search();
    }

    #[inline]
    fn flat(&self, p: Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    fn editable(&self, p: Point) -> Result<usize, EditError> {
        self.idx(p).ok_or(EditError::OutOfBounds(p))
    }

    /// Move the start cell to `p`. The old start becomes empty; a blocked
    /// target is cleared. Refuses to move onto the goal.
    pub fn set_start(&mut self, p: Point) -> Result<(), EditError> {
        let i = self.editable(p)?;
        if p == self.goal {
            return Err(EditError::Occupied(p));
        }
        let old = self.flat(self.start);
        self.kinds[old] = CellKind::Empty;
        self.kinds[i] = CellKind::Start;
        self.start = p;
        Ok(())
    }

    /// Move the goal cell to `p`. The old goal becomes empty; a blocked
    /// target is cleared. Refuses to move onto the start.
    pub fn set_goal(&mut self, p: Point) -> Result<(), EditError> {
        let i = self.editable(p)?;
        if p == self.start {
            return Err(EditError::Occupied(p));
        }
        let old = self.flat(self.goal);
        self.kinds[old] = CellKind::Empty;
        self.kinds[i] = CellKind::Goal;
        self.goal = p;
        Ok(())
    }

    /// Block or unblock the cell at `p`. Start and goal cannot be blocked.
    pub fn set_blocked(&mut self, p: Point, blocked: bool) -> Result<(), EditError> {
        let i = self.editable(p)?;
        if p == self.start || p == self.goal {
            return Err(EditError::Occupied(p));
        }
        self.kinds[i] = if blocked {
            CellKind::Blocked
        } else {
            CellKind::Empty
        };
        Ok(())
    }

    /// Flip the blocked state of `p`, returning whether it is now blocked.
    pub fn toggle_blocked(&mut self, p: Point) -> Result<bool, EditError> {
        let blocked = self.kind(p) != Some(CellKind::Blocked);
        self.set_blocked(p, blocked)?;
        Ok(blocked)
    }

    /// Block or unblock every cell of `rng` that lies in the grid, skipping
    /// the start and goal cells. Returns the number of cells changed.
    pub fn fill_blocked(&mut self, rng: Range, blocked: bool) -> usize {
        let target = if blocked {
            CellKind::Blocked
        } else {
            CellKind::Empty
        };
        let mut changed = 0;
        for p in rng.intersect(self.bounds) {
            let i = self.flat(p);
            let kind = self.kinds[i];
            if matches!(kind, CellKind::Start | CellKind::Goal) || kind == target {
                continue;
            }
            self.kinds[i] = target;
            changed += 1;
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Search bookkeeping
    // -----------------------------------------------------------------------

    /// How many times the last search touched `p` (0 if out of bounds).
    #[inline]
    pub fn visits(&self, p: Point) -> u32 {
        self.idx(p).map_or(0, |i| self.visits[i])
    }

    /// Row-major view of every visit counter.
    #[inline]
    pub fn visit_counts(&self) -> &[u32] {
        &self.visits
    }

    /// Increment the visit counter of `p`.
    #[inline]
    pub fn touch(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.visits[i] = self.visits[i].saturating_add(1);
        }
    }

    /// The predecessor of `p` on the search tree.
    #[inline]
    pub fn parent(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        match self.parents[i] {
            NO_PARENT => None,
            pi => Some(self.point(pi)),
        }
    }

    /// Set or clear the predecessor of `p`. Out-of-bounds points are ignored.
    #[inline]
    pub fn set_parent(&mut self, p: Point, parent: Option<Point>) {
        let Some(i) = self.idx(p) else {
            return;
        };
        self.parents[i] = parent.and_then(|pp| self.idx(pp)).unwrap_or(NO_PARENT);
    }

    /// Clear every visit counter and parent link.
    pub fn reset_search(&mut self) {
        self.visits.fill(0);
        self.parents.fill(NO_PARENT);
    }

    /// Walk parent links from `to` back to the root of its tree and return
    /// the points root-first. Returns `None` if `to` is out of bounds or the
    /// chain is longer than the grid (a cycle).
    pub fn trace(&self, to: Point) -> Option<Vec<Point>> {
        let mut i = self.idx(to)?;
        let mut path = vec![to];
        while self.parents[i] != NO_PARENT {
            if path.len() >= self.len() + 1 {
                return None;
            }
            i = self.parents[i];
            path.push(self.point(i));
        }
        path.reverse();
        Some(path)
    }
}

impl fmt::Display for GridModel {
    /// One line per row of persisted cell codes; parses back with
    /// [`GridModel::from_ascii`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            write!(f, "{}", kind.code())?;
            if (i + 1) % self.width == 0 && i + 1 < self.kinds.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
