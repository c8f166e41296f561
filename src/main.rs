use anyhow::Context;
use clap::{Parser as ClapParser, ValueHint};
use imp::{lex, Environment, EvalConfig, Evaluator, ImpParser};
use std::{
    fs,
    path::PathBuf,
    process,
    time::{Duration, Instant},
};
use tracing::{debug, info, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Runs an Imp program and prints its final variables.
#[derive(ClapParser, Debug)]
#[command(name = "imp", version = imp::VERSION)]
struct Options {
    /// The Imp source file to run.
    #[arg(value_hint = ValueHint::FilePath)]
    path: PathBuf,

    /// Abort any `while` loop after this many iterations.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Print the final environment as a JSON object.
    #[arg(long)]
    json: bool,

    /// Print the parsed program as JSON instead of running it.
    #[arg(long)]
    ast: bool,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let options = Options::parse();

    init_logger(options.verbose);

    if let Err(err) = run(&options) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(options: &Options) -> anyhow::Result<()> {
    let source = fs::read_to_string(&options.path)
        .with_context(|| format!("failed to read '{}'", options.path.display()))?;

    let started_at = Instant::now();
    let tokens = lex(&source)?;
    let program = ImpParser::new().parse(&tokens)?;
    debug!("Parsing took {}.", format_duration(started_at.elapsed()));

    if options.ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let config = EvalConfig {
        max_loop_iterations: options.max_iterations,
    };
    let mut env = Environment::new();
    let started_at = Instant::now();
    Evaluator::with_config(&mut env, config).execute(&program)?;
    info!("Execution took {}.", format_duration(started_at.elapsed()));

    if options.json {
        println!("{}", serde_json::to_string_pretty(&env)?);
    } else {
        for (name, value) in env.iter() {
            println!("{}: {}", name, value);
        }
    }
    Ok(())
}

fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_millis(1) {
        format!("{} µs", duration.as_micros())
    } else {
        format!("{} ms", duration.as_millis())
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let console_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter::filter_fn(move |metadata| {
            // For external packages, show only the error logs.
            metadata.level() <= &Level::ERROR
                || (metadata.level() <= &level
                    && metadata
                        .module_path()
                        .unwrap_or_default()
                        .starts_with("imp"))
        }));
    tracing_subscriber::registry().with(console_log).init();
}
