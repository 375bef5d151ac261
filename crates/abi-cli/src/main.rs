use std::io::{self, Read, Write};

use abi_cli::{CliError, Output};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "abi", about = "Read and write JSON documents by path")]
struct Cli {
    /// Path segment separator.
    #[arg(long, global = true, default_value = ".")]
    sep: String,
    /// Sort object keys in the output.
    #[arg(long, global = true)]
    sorted: bool,
    /// Pretty-print with this many spaces per level.
    #[arg(long, global = true)]
    indent: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path of the document on stdin.
    Get { path: String },
    /// Write a JSON value at a path and print the document.
    Set { path: String, value: String },
    /// Re-encode the document on stdin.
    Fmt,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("ABI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let output = Output {
        sorted: cli.sorted,
        indent: cli.indent,
    };

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let out = match &cli.command {
        Commands::Get { path } => abi_cli::get(&input, path, &cli.sep, &output)?,
        Commands::Set { path, value } => abi_cli::set(&input, path, value, &cli.sep, &output)?,
        Commands::Fmt => abi_cli::fmt(&input, &output)?,
    };
    io::stdout().write_all(&out)?;
    Ok(())
}
