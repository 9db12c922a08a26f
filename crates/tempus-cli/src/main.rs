//! Command-line front-end for the tempus temporal game solver.

use clap::{Parser, ValueEnum};
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempus_game::{validate, ValidationError};
use tempus_solver::{
    BackwardAttractorSolver, ExpansionSolver, Solution, SolveError, Solver,
};
use tempus_syntax::{parse_description, Description};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TEMPUS_GIT_HASH"),
    " ",
    env!("TEMPUS_GIT_DATE"),
    ")"
);

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse error: {message}")]
    #[diagnostic(code(tempus::parse_error))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("validation error: {0}")]
    #[diagnostic(code(tempus::validation_error))]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    #[diagnostic(code(tempus::solver_error))]
    Solve(#[from] SolveError),

    #[error("{message}")]
    Usage { message: String },
}

impl CliError {
    fn from_parse_error(err: tempus_syntax::ParseError, source: &str, filename: &str) -> Self {
        // Point the label at the offending line.
        let line = err.line() as usize;
        let start: usize = source
            .lines()
            .take(line.saturating_sub(1))
            .map(|l| l.len() + 1)
            .sum();
        let len = source.lines().nth(line - 1).map_or(0, str::len);
        CliError::Parse {
            message: err.to_string(),
            src: NamedSource::new(filename, source.to_string()),
            span: (start, len).into(),
        }
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverChoice {
    /// Backward time-indexed attractor (reachability objectives only).
    Reachability,
    /// Static time-unfolding solver (reference, all objective kinds).
    Expansion,
}

#[derive(Parser)]
#[command(name = "tempus", version, long_version = LONG_VERSION)]
#[command(about = "Solve reachability games with Presburger temporal constraints", long_about = None)]
struct Cli {
    /// Path to the game description (stdin if omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Show debug-level output
    #[arg(short, long)]
    verbose: bool,

    /// Show trace-level output
    #[arg(short, long)]
    debug: bool,

    /// Time horizon; overrides the description's `// time_bound:` directive
    #[arg(short = 't', long = "time-bound", value_name = "N")]
    time_bound: Option<u32>,

    /// Parse and validate the description, then exit
    #[arg(long)]
    validate: bool,

    /// Emit one benchmark CSV row instead of the winner listing
    #[arg(long)]
    csv: bool,

    /// Print solve timings only
    #[arg(long = "time-only")]
    time_only: bool,

    /// Solver backend
    #[arg(short, long, value_enum, default_value_t = SolverChoice::Expansion)]
    solver: SolverChoice,
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    // Usage errors exit 1; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print().ok();
            std::process::exit(code);
        }
    };

    let filter = if cli.debug {
        EnvFilter::new("trace")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let (source, name) = read_input(cli.file.as_deref())?;

    let description = parse_description(&source)
        .map_err(|err| CliError::from_parse_error(err, &source, &name))?;
    debug!(
        vertices = description.game.vertex_count(),
        edges = description.game.edge_count(),
        objective = %description.objective.kind,
        "description parsed"
    );

    validate(&description.game, &description.objective)?;

    if cli.validate {
        for warning in &description.warnings {
            println!("warning: {warning}");
        }
        println!(
            "ok: {} vertices, {} edges, {} targets",
            description.game.vertex_count(),
            description.game.edge_count(),
            description.objective.targets().len(),
        );
        return Ok(());
    }

    let horizon = cli
        .time_bound
        .or(description.time_bound)
        .ok_or_else(|| CliError::Usage {
            message: "no time bound: pass -t N or add a `// time_bound: N` directive".to_string(),
        })?;

    let solution = solve(&description, cli.solver, horizon)?;

    if cli.csv {
        println!(
            "{}",
            solution
                .stats()
                .csv_row(solution.solver(), &name, "solved")
        );
    } else if cli.time_only {
        let stats = solution.stats();
        println!("total_seconds={:.6}", stats.total_time.as_secs_f64());
        println!(
            "constraint_eval_seconds={:.6}",
            stats.constraint_eval_time.as_secs_f64()
        );
        println!(
            "graph_traversal_seconds={:.6}",
            stats.traversal_time.as_secs_f64()
        );
    } else {
        print_partition(&description, &solution, horizon);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> CliResult<(String, String)> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|err| CliError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            let name = path
                .file_stem()
                .map_or_else(|| "input".to_string(), |s| s.to_string_lossy().into_owned());
            Ok((source, name))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|err| CliError::Io {
                    path: "<stdin>".to_string(),
                    message: err.to_string(),
                })?;
            Ok((source, "stdin".to_string()))
        }
    }
}

fn solve(
    description: &Description,
    choice: SolverChoice,
    horizon: u32,
) -> CliResult<Solution> {
    let game = &description.game;
    let objective = &description.objective;
    let solution = match choice {
        SolverChoice::Reachability => {
            BackwardAttractorSolver::new().solve(game, objective, horizon)?
        }
        SolverChoice::Expansion => ExpansionSolver::new().solve(game, objective, horizon)?,
    };
    info!(
        solver = solution.solver(),
        horizon,
        states = solution.stats().states_explored,
        constraint_evals = solution.stats().constraint_evals,
        "solve finished"
    );
    Ok(solution)
}

fn print_partition(description: &Description, solution: &Solution, horizon: u32) {
    let game = &description.game;
    println!(
        "objective: {} over {} steps",
        description.objective.kind, horizon
    );
    for (id, vertex) in game.vertices() {
        match solution.strategy(id) {
            Some(next) => println!(
                "  {}: {} (move to {})",
                vertex.name,
                solution.winner(id),
                game.name(next)
            ),
            None => println!("  {}: {}", vertex.name, solution.winner(id)),
        }
    }
    let winning = solution.winning_set().len();
    println!(
        "player 0 wins from {winning}/{} vertices at time 0",
        game.vertex_count()
    );
}
