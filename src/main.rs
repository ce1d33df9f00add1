use std::io;
use std::process::exit;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::error::ErrorKind;
use clap::Parser;
use log::{info, LevelFilter};

use simplex::experiment::{run_experiments, ExperimentConfig};
use simplex::{solve, Context, Outcome, SimplexError, Tableau};

const EXIT_INVALID_ARGUMENTS: i32 = 13;

/// Two-phase full tableau simplex method.
///
/// Reads a tableau from standard input: a line `M N` followed by M rows of N numbers. Row 0 holds
/// the costs, column 0 the right-hand sides.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// Trace every step of the algorithm on standard error
    #[arg(short, long)]
    verbose: bool,
    /// Solve random problems and print statistics instead of reading a tableau
    #[arg(short = 'x', long)]
    experiments: bool,
    /// Seed for the experiments, taken from the clock when absent
    #[arg(long)]
    seed: Option<u64>,
    /// Multiplier for the problem sizes of the experiments
    #[arg(long, default_value_t = 1)]
    factor: usize,
    /// Number of problems per size in the experiments
    #[arg(long, default_value_t = 100)]
    runs: usize,
}

fn main() {
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_INVALID_ARGUMENTS,
            };
            let _ = error.print();
            exit(code);
        }
    };

    let level = if opts.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = if opts.experiments {
        experiments(&opts);
        Ok(())
    } else {
        solve_from_stdin(opts.verbose)
    };

    if let Err(error) = result {
        eprintln!("error: {}", error);
        exit(1);
    }
}

fn solve_from_stdin(verbose: bool) -> Result<(), SimplexError> {
    let mut tableau = Tableau::from_reader(io::stdin().lock())?;
    let mut context = if verbose { Context::tracing() } else { Context::default() };

    let outcome = solve(&mut tableau, &mut context);
    for (phase, step) in context.take_trace() {
        eprintln!("[{}] {}", phase, step);
    }
    info!("{} pivots", context.pivots());

    match outcome? {
        Outcome::Optimal(solution) => {
            print!("{}", tableau);
            print!("{}", solution);
        }
        Outcome::Infeasible => println!("infeasible"),
        Outcome::Unbounded => println!("unbounded"),
    }
    Ok(())
}

fn experiments(opts: &Opts) {
    let seed = opts.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    });
    let config = ExperimentConfig {
        seed,
        factor: opts.factor,
        runs: opts.runs,
        ..ExperimentConfig::default()
    };

    println!("seed: {}", seed);
    for report in run_experiments(&config) {
        println!("{}", report);
    }
}
