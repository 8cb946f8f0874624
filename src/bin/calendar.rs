//! Solve the calendar puzzle for a date and print the tilings.

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use algox::puzzle::{Board, Month, calendar};

#[derive(Debug, Parser)]
#[command(version, about = "Solve the puzzle-a-day calendar for a date")]
struct Args {
    /// Month to leave uncovered: a name, a three letter abbreviation, or 1-12.
    month: Month,

    /// Day of the month to leave uncovered.
    #[arg(value_parser = clap::value_parser!(u32).range(1..=31))]
    day: u32,

    /// Print at most this many solutions.
    #[arg(short, long, default_value_t = 1)]
    limit: usize,

    /// Only print the number of solutions.
    #[arg(short, long)]
    count: bool,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    match args.verbose {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(LevelFilter::Trace);
        }
    }
    logger.init();

    let pieces = calendar::pieces();
    let board = Board::calendar(args.month, args.day)
        .with_context(|| format!("Setting up {} {}", args.month, args.day))?;
    let mut problem = board
        .problem(&pieces)
        .context("Building the coverage tables")?;
    info!(
        "{} {}: {} columns, {} placements",
        args.month,
        args.day,
        problem.column_count(),
        problem.row_count()
    );

    let mut solutions = problem.solutions();
    if args.count {
        let count = solutions.by_ref().count();
        println!("{count}");
    } else {
        for (i, solution) in solutions.by_ref().take(args.limit).enumerate() {
            if i > 0 {
                println!();
            }
            let tiling = board
                .tiling(&pieces, &solution)
                .context("Drawing a solution")?;
            println!("{tiling}");
        }
    }
    debug!("{:?}", solutions.stats());
    Ok(())
}
