//! Shared pieces of the headless demo: argument parsing and a text
//! rendering of a searched grid.
//!
//! The renderer draws what a graphical host would: walls, the endpoints,
//! the cells the search touched and the final path.

use pathviz_core::{CellKind, GridModel};
use pathviz_search::{Algorithm, Heuristic, Path, SearchOptions};

pub const WIDTH: i32 = 31;
pub const HEIGHT: i32 = 15;

/// Demo settings, read from `key=value` arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoArgs {
    pub options: SearchOptions,
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    /// Carve a maze before searching; otherwise search the open grid.
    pub maze: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            options: SearchOptions::new(Algorithm::AStar).with_heuristic(Heuristic::Octile),
            seed: 42,
            width: WIDTH,
            height: HEIGHT,
            maze: true,
        }
    }
}

impl DemoArgs {
    /// Parse `algo=`, `heuristic=`, `diagonal=`, `beam=`, `seed=`, `size=WxH`
    /// and `maze=` arguments. Unknown keys are rejected.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got {arg:?}"))?;
            match key {
                "algo" => out.options.algorithm = value.parse().map_err(|e| format!("{e}"))?,
                "heuristic" => out.options.heuristic = value.parse().map_err(|e| format!("{e}"))?,
                "diagonal" => out.options.diagonal = parse_bool(value)?,
                "beam" => {
                    out.options.beam_width =
                        Some(value.parse().map_err(|_| format!("bad beam width {value:?}"))?)
                }
                "seed" => out.seed = value.parse().map_err(|_| format!("bad seed {value:?}"))?,
                "size" => (out.width, out.height) = parse_size(value)?,
                "maze" => out.maze = parse_bool(value)?,
                _ => return Err(format!("unknown option {key:?}")),
            }
        }
        Ok(out)
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(format!("bad flag {value:?}")),
    }
}

fn parse_size(value: &str) -> Result<(i32, i32), String> {
    let bad = || format!("bad size {value:?}, expected WxH");
    let (w, h) = value.split_once('x').ok_or_else(bad)?;
    Ok((w.parse().map_err(|_| bad())?, h.parse().map_err(|_| bad())?))
}

/// Draw `grid` one character per cell: `#` wall, `S` start, `G` goal, `*`
/// path, `.` touched by the search, space otherwise.
pub fn render(grid: &GridModel, path: Option<&Path>) -> String {
    let mut out = String::with_capacity(grid.len() + grid.height() as usize);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = pathviz_core::Point::new(x, y);
            let ch = match grid.kind(p) {
                Some(CellKind::Blocked) => '#',
                Some(CellKind::Start) => 'S',
                Some(CellKind::Goal) => 'G',
                _ if path.is_some_and(|path| path.contains(p)) => '*',
                _ if grid.visits(p) > 0 => '.',
                _ => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

/// One-line description of a finished run.
pub fn summary(
    options: &SearchOptions,
    path: Option<&Path>,
    expanded: usize,
    visits: u64,
) -> String {
    let name = if options.algorithm.uses_heuristic() {
        format!("{} ({})", options.algorithm, options.heuristic)
    } else {
        options.algorithm.to_string()
    };
    let outcome = match path {
        Some(path) => format!("path of {} cells, cost {:.3}", path.len(), path.cost()),
        None => "no path".to_string(),
    };
    format!("{name}: {outcome}; {expanded} expansions, {visits} visits")
}
