use std::io::{stdin, BufRead, IsTerminal};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use log::LevelFilter;

use eight_puzzle::{
    parse_board, reference_distance, search, solve_best, Board, Heuristic, Move, Outcome,
    SearchStats, GOAL,
};

#[derive(Clone, Copy, ValueEnum)]
enum Choice {
    Manhattan,
    Misplaced,
    /// Run both and keep the shorter path
    Both,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Heuristic to search with
    #[arg(short = 'H', long, value_enum, default_value_t = Choice::Both)]
    heuristic: Choice,
    /// Goal board (default "1 2 3/4 5 6/7 8 _")
    #[arg(short, long, value_name = "BOARD")]
    goal: Option<String>,
    /// Print the board after every move
    #[arg(short, long)]
    steps: bool,
    /// Check the move count against a breadth-first search
    #[arg(long)]
    verify: bool,
    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Boards such as "1 2 3/4 5 6/7 _ 8"; read from stdin, one per line, when omitted
    boards: Vec<String>,
}

// board text either from the command line or from stdin
#[auto_enums::auto_enum(Iterator)]
fn inputs(boards: Vec<String>) -> impl Iterator<Item = Result<String>> {
    if boards.is_empty() {
        stdin()
            .lock()
            .lines()
            .map(|line| line.context("Failed to read from stdin"))
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
    } else {
        boards.into_iter().map(Ok)
    }
}

fn print_stats(heuristic: Heuristic, stats: SearchStats) {
    println!(
        "{}: visited {} board positions (generated {} total).",
        heuristic, stats.expanded, stats.generated
    );
}

fn solve(board: &Board, goal: &Board, choice: Choice) -> (Vec<Move>, String, Outcome) {
    let heuristic = match choice {
        Choice::Both => {
            let solution = solve_best(board, goal);
            print_stats(Heuristic::Manhattan, solution.manhattan);
            print_stats(Heuristic::MisplacedTiles, solution.misplaced);
            let label = solution.label();
            return (solution.moves, label, solution.outcome);
        }
        Choice::Manhattan => Heuristic::Manhattan,
        Choice::Misplaced => Heuristic::MisplacedTiles,
    };

    let result = search(board, goal, heuristic.estimator());
    print_stats(heuristic, result.stats);
    (result.moves, format!("({heuristic})"), result.outcome)
}

fn run(board: &Board, goal: &Board, cli: &Cli) -> Result<()> {
    println!("----");
    println!("{board}");
    println!("----");

    let (moves, label, outcome) = solve(board, goal, cli.heuristic);
    match outcome {
        Outcome::Solved => {}
        Outcome::Unsolvable => {
            println!("This puzzle is impossible to solve.");
            return Ok(());
        }
        Outcome::Exhausted => bail!("Search ended without reaching the goal."),
    }

    println!(
        "Goal reached in {} moves {label}: {}",
        moves.len(),
        moves.iter().join(" ")
    );

    if cli.steps {
        let mut current = *board;
        for mov in &moves {
            current = current
                .slide(*mov)
                .with_context(|| format!("Illegal move {mov} in solution"))?;
            println!();
            println!("{mov}:");
            println!("{current}");
        }
    }

    if cli.verify {
        let expected =
            reference_distance(board, goal).context("Breadth-first search found no path")?;
        if expected != moves.len() {
            bail!(
                "Found {} moves but the shortest path has {expected}.",
                moves.len()
            );
        }
        println!("Verified: {expected} moves is optimal.");
    }

    Ok(())
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    let goal = match &cli.goal {
        Some(text) => parse_board(text).context("Failed to parse goal")?,
        None => GOAL,
    };

    if cli.boards.is_empty() && stdin().is_terminal() {
        bail!("No boards given and nothing on stdin.");
    }

    for input in inputs(std::mem::take(&mut cli.boards)) {
        let input = input?;
        let board =
            parse_board(&input).with_context(|| format!("Failed to parse board {input:?}"))?;
        run(&board, &goal, &cli)?;
    }

    Ok(())
}
