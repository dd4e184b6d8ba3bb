use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as _, Subcommand};
use cpu_time::ProcessTime;
use lox_front::{parse_source, tokenize, LoxError};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser, Debug)]
#[command(name = "lox", about = "Tokenize or parse Lox expressions")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token stream of a source file.
    Tokenize { filename: PathBuf },
    /// Print each expression in a source file as an S-expression.
    Parse { filename: PathBuf },
}

fn read_source(path: &Path) -> Result<String, LoxError> {
    fs::read_to_string(path).map_err(|source| LoxError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run_tokenize(path: &Path) -> Result<(), LoxError> {
    let source = read_source(path)?;

    let start = ProcessTime::now();
    let tokenized = tokenize(&source);
    tracing::debug!(elapsed = ?start.elapsed(), "scan finished");

    for error in &tokenized.errors {
        eprintln!("{}", error);
    }
    for token in &tokenized.tokens {
        println!("{}", token);
    }

    if tokenized.has_errors() {
        return Err(LoxError::Lex(tokenized.errors));
    }
    Ok(())
}

fn run_parse(path: &Path) -> Result<(), LoxError> {
    let source = read_source(path)?;

    let start = ProcessTime::now();
    let result = parse_source(&source);
    tracing::debug!(elapsed = ?start.elapsed(), "parse finished");

    match result {
        Ok(expressions) => {
            for expr in &expressions {
                println!("{}", expr);
            }
            Ok(())
        }
        Err(error) => {
            report(&error);
            Err(error)
        }
    }
}

/// Writes every collected diagnostic in `error` to stderr.
fn report(error: &LoxError) {
    match error {
        LoxError::Lex(errors) => errors.iter().for_each(|e| eprintln!("{}", e)),
        LoxError::Parse(errors) => errors.iter().for_each(|e| eprintln!("{}", e)),
        LoxError::Io { .. } => eprintln!("{}", error),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "starting");

    let result = match &args.command {
        Command::Tokenize { filename } => run_tokenize(filename),
        Command::Parse { filename } => run_parse(filename),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let LoxError::Io { .. } = error {
                report(&error);
            }
            tracing::info!(%error, "exiting with failure");
            ExitCode::from(error.exit_code())
        }
    }
}
