mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, format, init, validate, ApplyArgs, FormatArgs, InitArgs, ValidateArgs};
use std::path::PathBuf;

/// Pagecraft CLI - block-based page editing from the terminal
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagecraft project
    Init(InitArgs),

    /// Check page documents for syntax and structure errors
    Validate(ValidateArgs),

    /// Rewrite a page into canonical form
    Format(FormatArgs),

    /// Replay a script of editor commands against a page
    Apply(ApplyArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Format(args) => format(args, &cwd),
        Command::Apply(args) => apply(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
