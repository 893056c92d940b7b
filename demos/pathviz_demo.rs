//! Headless pathfinding demo.
//!
//! Carves a maze, runs a search on a worker thread while polling progress
//! like an animating host would, prints the result and checks that the
//! grid survives a save/load round trip.
//!
//! Run: cargo run --bin pathviz-demo -- algo=idastar diagonal=off seed=3

use std::thread;
use std::time::Duration;

use pathviz_core::{DEFAULT_NODE_SIZE, GridModel, load_grid, save_grid};
use pathviz_demos::{DemoArgs, render, summary};
use pathviz_maze::MazeGen;
use pathviz_search::{Poll, start_search};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = DemoArgs::parse(std::env::args().skip(1))?;

    let mut grid = GridModel::new(args.width, args.height)?;
    if args.maze {
        MazeGen::new(StdRng::seed_from_u64(args.seed)).carve(&mut grid)?;
    }

    let mut handle = start_search(grid, args.options)?;
    let mut polls = 0u32;
    while handle.poll().is_running() {
        polls += 1;
        thread::sleep(Duration::from_millis(1));
    }
    let expanded = handle.expansions();
    let (state, grid) = handle.wait()?;
    log::debug!("search finished after {polls} polls");

    let path = match &state {
        Poll::Succeeded(path) => Some(path),
        Poll::Failed => None,
        Poll::Running | Poll::Cancelled => return Err("search did not finish".into()),
    };
    let visits: u64 = grid.visit_counts().iter().map(|&v| u64::from(v)).sum();
    print!("{}", render(&grid, path));
    println!("{}", summary(&args.options, path, expanded, visits));

    let json = save_grid(&grid, DEFAULT_NODE_SIZE)?;
    let (loaded, node_size) = load_grid(&json)?;
    if loaded.kinds() != grid.kinds() || node_size != DEFAULT_NODE_SIZE {
        return Err("saved grid does not load back".into());
    }
    println!("saved layout: {} bytes of JSON", json.len());
    Ok(())
}
