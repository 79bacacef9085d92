use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser};
use crossterm::style::Stylize;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn, Level};

use slider_search::{Cell, DepthLimited, Search, SearchConfig, State, Strategy};

#[derive(Parser, Debug)]
#[command(
    name = "slider-search",
    about = "Solve sliding-tile puzzles with uninformed and informed search"
)]
struct Cli {
    /// Search strategy: dfs, bfs, dls, ids or astar
    #[arg(short, long, default_value = "astar")]
    strategy: Strategy,

    /// Edge length of the generated puzzle when no grid is given
    #[arg(short = 'n', long, default_value_t = 3)]
    size: usize,

    /// Start grid, e.g. "_ 1 / 2 3" ('_' blank, '.' empty cell)
    #[arg(long, value_name = "GRID")]
    start: Option<State>,

    /// Goal grid; defaults to tiles in order with the blank last
    #[arg(long, value_name = "GRID")]
    goal: Option<State>,

    /// Random slides applied to the goal to build the start grid
    #[arg(long, default_value_t = 12)]
    scramble: usize,

    /// Depth bound for dls and ids
    #[arg(short, long, default_value_t = 20)]
    depth: usize,

    /// Seed for scrambling and child ordering
    #[arg(long)]
    seed: Option<u64>,

    /// Abort after generating this many nodes
    #[arg(long, value_name = "N")]
    max_nodes: Option<usize>,

    /// Abort after this many milliseconds
    #[arg(long, value_name = "MS")]
    time_limit: Option<u64>,

    /// Let dfs, bfs, dls and ids revisit states already on the current path
    #[arg(long)]
    allow_cycles: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let goal = match cli.goal {
        Some(goal) => goal,
        None => State::solved(cli.start.as_ref().map_or(cli.size, State::size))
            .context("cannot build goal grid")?,
    };
    let start = match cli.start {
        Some(start) => start,
        None => goal.scrambled(cli.scramble, &mut rng),
    };

    println!("Start:\n{}", render(&start, &goal));
    println!("Goal:\n{}", render(&goal, &goal));

    if !start.parity_permits(&goal) {
        warn!("goal cannot be reached from this start grid, the search will exhaust its frontier");
    }

    let mut config = SearchConfig::default().with_cycle_pruning(!cli.allow_cycles);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_nodes) = cli.max_nodes {
        config = config.with_max_generated(max_nodes);
    }
    if let Some(ms) = cli.time_limit {
        config = config.with_time_limit(Duration::from_millis(ms));
    }

    info!(
        strategy = %cli.strategy,
        size = start.size(),
        depth = ?cli.strategy.is_bounded().then_some(cli.depth),
        "starting search"
    );
    let mut search = Search::new(config);
    let started = Instant::now();
    let outcome = match search.run(cli.strategy, &start, &goal, cli.depth) {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(generated) = err.generated() {
                warn!(generated, elapsed = ?started.elapsed(), "search stopped");
            }
            return Err(err).with_context(|| format!("{} search failed", cli.strategy));
        }
    };
    let elapsed = started.elapsed();

    match outcome {
        DepthLimited::Cutoff { generated } => {
            println!(
                "No solution within depth {} ({} nodes generated in {:.2?})",
                cli.depth, generated, elapsed
            );
        }
        DepthLimited::Found(result) => {
            let path = result.path();
            println!(
                "Found solution with {} moves ({} nodes generated in {:.2?})",
                path.len(),
                result.generated,
                elapsed
            );

            let mut current = start;
            for movement in path {
                if let Some(next) = current.apply_move(movement) {
                    current = next;
                    println!("{}\n{}", movement, render(&current, &goal));
                }
            }
        }
    }

    Ok(())
}

/// Grid text with tiles already in their goal cell highlighted.
fn render(state: &State, goal: &State) -> String {
    let grid = state.grid();
    let mut out = String::new();

    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let cell = grid.get(row, col);
            let text = match cell {
                Some(Cell::Tile(id)) if goal.grid().get(row, col) == cell => {
                    format!("{} ", format!("{:2}", id).green().bold())
                }
                Some(Cell::Tile(id)) => format!("{:2} ", id),
                Some(Cell::Empty) => format!("{} ", " .".dark_grey()),
                _ => format!("{} ", " _".dark_grey()),
            };
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}
