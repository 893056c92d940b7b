//! Running a search on a worker thread.
//!
//! The worker owns the [`GridModel`] for the duration of the run and hands
//! it back from [`SearchHandle::wait`]. Progress flows to the host over a
//! bounded channel; cancellation flows the other way through a shared
//! [`Context`]. A host that polls slowly misses some progress batches but
//! never the final result.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pathviz_core::{GridError, GridModel, Point};

use crate::path::Path;
use crate::search::{Search, SearchOptions, SearchStatus};

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Default number of recently expanded cells a [`SearchHandle`] keeps.
pub const DEFAULT_HISTORY: usize = 256;

// Steps of progress the channel buffers before the worker drops batches.
const PROGRESS_CAPACITY: usize = 64;

/// Host-side settings for a worker run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaskConfig {
    /// Pause after every step, for animation. Zero runs at full speed.
    pub step_delay: Duration,
    /// How many of the most recently expanded cells the handle keeps.
    pub history: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::ZERO,
            history: DEFAULT_HISTORY,
        }
    }
}

/// What the host sees of a worker run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Poll {
    Running,
    Succeeded(Path),
    Failed,
    Cancelled,
}

impl Poll {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Succeeded(path) => Some(path),
            _ => None,
        }
    }
}

impl From<&SearchStatus> for Poll {
    fn from(status: &SearchStatus) -> Self {
        match status {
            SearchStatus::Ready | SearchStatus::Running => Self::Running,
            SearchStatus::Succeeded(path) => Self::Succeeded(path.clone()),
            SearchStatus::Failed => Self::Failed,
            SearchStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Errors from collecting a worker run.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("search worker panicked")]
    WorkerPanicked,
}

/// Start a search on its own thread with the default [`TaskConfig`].
///
/// The grid is validated and reset on the calling thread, so an invalid
/// grid is reported here and no thread is started.
pub fn start_search(grid: GridModel, options: SearchOptions) -> Result<SearchHandle, GridError> {
    start_search_with(grid, options, TaskConfig::default())
}

/// Like [`start_search`] with explicit host settings.
pub fn start_search_with(
    mut grid: GridModel,
    options: SearchOptions,
    config: TaskConfig,
) -> Result<SearchHandle, GridError> {
    let mut search = Search::new(&mut grid, options)?;
    let ctx = Context::new();
    let wctx = ctx.clone();
    let expansions = Arc::new(AtomicUsize::new(0));
    let wexpansions = Arc::clone(&expansions);
    let (progress_tx, progress_rx) = mpsc::sync_channel(PROGRESS_CAPACITY);
    let (result_tx, result_rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        search.run_with(&mut grid, &wctx, |s| {
            let cells = s.last_expanded();
            wexpansions.fetch_add(cells.len(), Ordering::Relaxed);
            send_progress(&progress_tx, &wctx, cells);
            if !config.step_delay.is_zero() && !s.status().is_terminal() {
                thread::sleep(config.step_delay);
            }
        });
        if result_tx.send(Poll::from(search.status())).is_err() {
            log::debug!("search result dropped: handle is gone");
        }
        grid
    });
    Ok(SearchHandle {
        ctx,
        progress: progress_rx,
        result: result_rx,
        worker: Some(worker),
        state: Poll::Running,
        expansions,
        recent: VecDeque::with_capacity(config.history.min(DEFAULT_HISTORY)),
        history: config.history,
    })
}

fn send_progress(tx: &SyncSender<Vec<Point>>, ctx: &Context, cells: &[Point]) {
    if cells.is_empty() {
        return;
    }
    match tx.try_send(cells.to_vec()) {
        Ok(()) | Err(TrySendError::Full(_)) => {}
        // Handle gone: nobody is watching any more.
        Err(TrySendError::Disconnected(_)) => ctx.cancel(),
    }
}

/// Host side of a worker run. Dropping the handle cancels the run.
#[derive(Debug)]
pub struct SearchHandle {
    ctx: Context,
    progress: Receiver<Vec<Point>>,
    result: Receiver<Poll>,
    worker: Option<JoinHandle<GridModel>>,
    state: Poll,
    expansions: Arc<AtomicUsize>,
    recent: VecDeque<Point>,
    history: usize,
}

impl SearchHandle {
    /// Ask the worker to stop at its next step.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    /// Collect pending progress without blocking and return the latest state.
    pub fn poll(&mut self) -> &Poll {
        while let Ok(cells) = self.progress.try_recv() {
            self.remember(cells);
        }
        if self.state.is_running() {
            match self.result.try_recv() {
                Ok(state) => self.state = state,
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("search worker exited without a result");
                    self.state = Poll::Cancelled;
                }
            }
        }
        &self.state
    }

    fn remember(&mut self, cells: Vec<Point>) {
        for p in cells {
            if self.recent.len() == self.history {
                self.recent.pop_front();
            }
            if self.history > 0 {
                self.recent.push_back(p);
            }
        }
    }

    /// The most recently received expanded cells, oldest first. At most
    /// [`TaskConfig::history`] are kept, and batches the host was too slow
    /// to collect are skipped.
    pub fn recent_expanded(&self) -> impl Iterator<Item = Point> + '_ {
        self.recent.iter().copied()
    }

    /// Total number of cells the worker has expanded so far.
    pub fn expansions(&self) -> usize {
        self.expansions.load(Ordering::Relaxed)
    }

    /// Whether the last [`poll`](Self::poll) saw a terminal state.
    pub fn is_finished(&self) -> bool {
        !self.state.is_running()
    }

    /// Block until the worker is done and take back the grid.
    pub fn wait(mut self) -> Result<(Poll, GridModel), TaskError> {
        let worker = self.worker.take().ok_or(TaskError::WorkerPanicked)?;
        let grid = worker.join().map_err(|_| TaskError::WorkerPanicked)?;
        self.poll();
        let state = std::mem::replace(&mut self.state, Poll::Running);
        Ok((state, grid))
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Algorithm;
    use pathviz_core::Range;

    #[test]
    fn context_cancel_is_shared() {
        let ctx = Context::default();
        let other = ctx.clone();
        assert!(!ctx.is_done());
        other.cancel();
        assert!(ctx.is_done());
    }

    #[test]
    fn worker_returns_path_and_grid() {
        let grid = GridModel::new(20, 20).unwrap();
        let handle = start_search(grid, SearchOptions::new(Algorithm::BreadthFirst)).unwrap();
        let (state, grid) = handle.wait().unwrap();
        let path = state.path().unwrap();
        assert_eq!(path.len(), 20);
        assert!(grid.visits(grid.goal()) > 0);
        assert_eq!(grid.trace(grid.goal()).unwrap(), path.points());
    }

    #[test]
    fn polling_reports_progress() {
        let grid = GridModel::new(8, 8).unwrap();
        let mut handle = start_search(grid, SearchOptions::new(Algorithm::AStar)).unwrap();
        while handle.poll().is_running() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.is_finished());
        assert!(matches!(handle.poll(), Poll::Succeeded(_)));
        assert_eq!(handle.recent_expanded().next(), Some(Point::new(0, 0)));
        assert_eq!(handle.recent_expanded().count(), handle.expansions());
    }

    #[test]
    fn progress_history_is_bounded() {
        // Walled-off goal: depth-first expands every cell on the start side.
        let mut grid = GridModel::new(40, 40).unwrap();
        grid.fill_blocked(Range::new(0, 20, 40, 21), true);
        let config = TaskConfig {
            history: 16,
            ..TaskConfig::default()
        };
        let mut handle =
            start_search_with(grid, SearchOptions::new(Algorithm::DepthFirst), config).unwrap();
        while handle.poll().is_running() {
            assert!(handle.recent_expanded().count() <= 16);
        }
        assert_eq!(*handle.poll(), Poll::Failed);
        assert_eq!(handle.expansions(), 40 * 20);
        assert!(handle.recent_expanded().count() <= 16);
    }

    #[test]
    fn result_arrives_without_polling() {
        // Far more steps than the progress channel buffers.
        let grid = GridModel::new(60, 60).unwrap();
        let options = SearchOptions::new(Algorithm::BreadthFirst).with_diagonal(false);
        let handle = start_search(grid, options).unwrap();
        let expansions = Arc::clone(&handle.expansions);
        let (state, _) = handle.wait().unwrap();
        assert_eq!(state.path().map(Path::len), Some(119));
        assert!(expansions.load(Ordering::Relaxed) > PROGRESS_CAPACITY);
    }

    #[test]
    fn cancel_stops_a_slow_run() {
        let grid = GridModel::new(30, 30).unwrap();
        let config = TaskConfig {
            step_delay: Duration::from_millis(5),
            ..TaskConfig::default()
        };
        let handle =
            start_search_with(grid, SearchOptions::new(Algorithm::Dijkstra), config).unwrap();
        handle.cancel();
        let (state, grid) = handle.wait().unwrap();
        assert_eq!(state, Poll::Cancelled);

        // The same grid runs again from scratch.
        let handle = start_search(grid, SearchOptions::new(Algorithm::Dijkstra)).unwrap();
        let (state, _) = handle.wait().unwrap();
        assert_eq!(state.path().map(Path::len), Some(30));
    }

    #[test]
    fn unreachable_goal_fails() {
        let grid = GridModel::from_ascii(
            "soo
             xxx
             oog",
        )
        .unwrap();
        let handle = start_search(grid, SearchOptions::new(Algorithm::IdaStar)).unwrap();
        let (state, _) = handle.wait().unwrap();
        assert_eq!(state, Poll::Failed);
    }
}
