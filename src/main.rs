use std::io::{self, Read};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wb_sql_format::config::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_SUBSELECT_LENGTH};
use wb_sql_format::{FormatOptions, try_format_sql};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Output keywords in lowercase
    #[arg(long)]
    lowercase: bool,

    /// Subselects shorter than this many non-blank characters are kept on one line
    #[arg(long, default_value_t = DEFAULT_MAX_SUBSELECT_LENGTH)]
    max_subselect_length: usize,

    /// Comma-separated database function names to write in uppercase
    #[arg(long, value_delimiter = ',')]
    functions: Vec<String>,

    /// Nested constructs deeper than this are left unformatted
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Fail instead of echoing a statement that cannot be formatted
    #[arg(long)]
    strict: bool,

    /// Log formatting decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = FormatOptions {
        uppercase: !cli.lowercase,
        ..FormatOptions::default()
    }
    .with_max_subselect_length(cli.max_subselect_length)
    .with_function_names(&cli.functions)
    .with_max_nesting_depth(cli.max_depth);

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error reading stdin: {}", e);
        process::exit(1);
    }

    if input.trim().is_empty() {
        eprintln!("Error: no SQL input provided");
        process::exit(1);
    }

    match try_format_sql(&input, &options) {
        Ok(formatted) => println!("{}", formatted),
        Err(failure) if cli.strict => {
            eprintln!("Error: {}", failure);
            process::exit(2);
        }
        Err(failure) => {
            tracing::warn!(error = %failure.error, "statement left unformatted");
            print!("{}", failure.into_original());
        }
    }
}
