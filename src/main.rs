mod board;
mod instance;
mod pqueue;
mod puzzle;
mod solver;

use board::Board;
use clap::Parser;
use instance::{Instance, InstanceError};
use puzzle::Puzzle;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use solver::{Node, SolveResult, Solver};
use std::fs::File;
use std::io::{self, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "taquin")]
#[command(about = "A weighted-A* sliding-tile puzzle solver", long_about = None)]
struct Args {
    /// Path to the instance file (initial board, blank line, goal board)
    #[arg(value_name = "FILE", required_unless_present = "scramble")]
    instance_file: Option<String>,

    /// Weight applied to the heuristic term (f = g + w*h)
    #[arg(short, long, default_value = "1.0")]
    weight: f64,

    /// Maximum number of nodes to expand before giving up
    #[arg(short = 'n', long, default_value = "5000000")]
    max_nodes: usize,

    /// Print the solution step-by-step
    #[arg(short, long)]
    print_solution: bool,

    /// Write the solution report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Ignore FILE and solve a random instance scrambled this many moves
    /// from the canonical goal
    #[arg(long, value_name = "STEPS")]
    scramble: Option<usize>,

    /// Seed for the scramble PRNG (defaults to OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn build_instance(args: &Args) -> Result<Instance, InstanceError> {
    if let Some(steps) = args.scramble {
        let goal = Board::canonical();
        let mut rng = match args.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut puzzle = Puzzle::new(goal.clone(), goal.clone())?;
        puzzle.scramble(steps, &mut rng);
        Ok(Instance {
            initial: puzzle.state().clone(),
            goal,
        })
    } else {
        match &args.instance_file {
            Some(path) => Instance::from_file(path),
            None => unreachable!("clap requires FILE unless --scramble is given"),
        }
    }
}

/// Write the solution report: boards, weight, solution depth, generated-node
/// count, the move letters along the path, and the f value of every path
/// node in root-to-goal order.
fn report<W: Write>(
    out: &mut W,
    instance: &Instance,
    weight: f64,
    path: &[Node],
    generated: usize,
) -> io::Result<()> {
    writeln!(out, "{}", instance.initial)?;
    writeln!(out)?;
    writeln!(out, "{}", instance.goal)?;
    writeln!(out)?;
    writeln!(out, "{}", weight)?;
    writeln!(out, "{}", path.len() - 1)?;
    writeln!(out, "{}", generated)?;

    let moves: Vec<String> = path
        .iter()
        .filter_map(|node| node.mv)
        .map(|mv| mv.to_string())
        .collect();
    writeln!(out, "{}", moves.join(" "))?;

    let costs: Vec<String> = path.iter().map(|node| node.f.to_string()).collect();
    writeln!(out, "{}", costs.join(" "))?;
    Ok(())
}

fn write_report(args: &Args, instance: &Instance, path: &[Node], generated: usize) -> io::Result<()> {
    match &args.output {
        Some(file) => report(&mut File::create(file)?, instance, args.weight, path, generated),
        None => report(&mut io::stdout().lock(), instance, args.weight, path, generated),
    }
}

fn print_solution(instance: &Instance, path: &[Node]) {
    println!("\nStarting position:\n{}", instance.initial);
    let total = path.len() - 1;
    for (count, node) in path.iter().enumerate().skip(1) {
        if let Some(mv) = node.mv {
            println!(
                "\nMove {} ({}/{}), g = {}, h = {}, f = {}:\n{}",
                mv, count, total, node.g, node.h, node.f, node.board
            );
        }
    }
}

fn main() {
    let args = Args::parse();

    let instance = match build_instance(&args) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    };

    let mut puzzle = match Puzzle::new(instance.goal.clone(), instance.initial.clone()) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut solver = Solver::new(args.weight, args.max_nodes);
    let start = Instant::now();
    let result = solver.solve(&mut puzzle);
    let elapsed_ms = start.elapsed().as_millis();

    let (solved_char, depth) = match &result {
        SolveResult::Solved(path) => ('Y', path.len() - 1),
        SolveResult::Cutoff => ('N', 0),
        SolveResult::Unsolvable => ('X', 0),
    };
    println!(
        "solved: {}  depth: {:<5}  expanded: {:<10}  generated: {:<12}  elapsed: {} ms",
        solved_char,
        depth,
        solver.nodes_expanded(),
        solver.nodes_generated(),
        elapsed_ms
    );

    if let SolveResult::Solved(path) = &result {
        if let Err(e) = write_report(&args, &instance, path, solver.nodes_generated()) {
            eprintln!("Error writing report: {}", e);
            std::process::exit(1);
        }
        if args.print_solution {
            print_solution(&instance, path);
        }
    }
}
