use std::{fs, process::ExitCode};

use clap::Parser;
use flax::{
    interpreter::{Config, evaluator::core::DEFAULT_MAX_CALL_DEPTH},
    run_with_config,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status when the script file cannot be read (`EX_NOINPUT`).
const EXIT_NO_INPUT: u8 = 66;

/// flax is a small dynamically typed scripting language with first-class
/// functions and closures.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat CONTENTS as the script itself instead of a path to a file.
    #[arg(short, long)]
    eval: bool,

    /// Deepest allowed nesting of function calls before the program fails
    /// with a stack overflow.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Log more about what the interpreter is doing. Repeat for more detail.
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a `.flax` file, or the script itself with `--eval`.
    contents: String,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                    .with_target(false))
                                  .with(filter)
                                  .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let script = if args.eval {
        args.contents
    } else {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(err) => {
                eprintln!("Failed to read the input file '{}': {err}", args.contents);
                return ExitCode::from(EXIT_NO_INPUT);
            },
        }
    };

    let config = Config { max_call_depth: args.max_depth };

    match run_with_config(&script, config, Box::new(std::io::stdout())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        },
    }
}
