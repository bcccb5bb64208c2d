mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, convert, init, replay, CheckArgs, ConvertArgs, InitArgs, ReplayArgs};

/// Richtext CLI - convert and check rich-text documents
#[derive(Parser, Debug)]
#[command(name = "richtext")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a richtext.config.json with the default vocabulary
    Init(InitArgs),

    /// Convert documents between HTML and the raw tree format
    Convert(ConvertArgs),

    /// Report content dropped on import and lossy HTML round trips
    Check(CheckArgs),

    /// Replay a script of edits and print the debounced notifications
    Replay(ReplayArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Convert(args) => convert(args, &cwd),
        Command::Check(args) => check(args, &cwd).and_then(|clean| {
            if clean {
                Ok(())
            } else {
                std::process::exit(1)
            }
        }),
        Command::Replay(args) => replay(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
