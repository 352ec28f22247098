mod bridge;
mod commands;
mod session;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    ActivateArgs, ApplyArgs, CreateArgs, DeleteArgs, DiffArgs, ListArgs, ShowArgs, VarsArgs,
    VersionsArgs,
};
use session::Session;

/// Templar CLI - template editing with version history
#[derive(Parser, Debug)]
#[command(name = "templar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read and write templates through a running templar-server
    /// (defaults to serverUrl from the config)
    #[arg(
        long,
        global = true,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    remote: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List templates
    List(ListArgs),

    /// Print a template's content
    Show(ShowArgs),

    /// List saved versions of a template
    Versions(VersionsArgs),

    /// Save a new version of a template
    Create(CreateArgs),

    /// Select the active version of a template
    Activate(ActivateArgs),

    /// Delete a saved version
    Delete(DeleteArgs),

    /// Compare two versions of a template
    Diff(DiffArgs),

    /// Write a version over the template file and activate it
    Apply(ApplyArgs),

    /// Show the variables a template can use
    Vars(VarsArgs),

    /// Record a backup of the original templates
    Backup,
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

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| Session::open(&cwd, cli.remote))
        .and_then(|session| match cli.command {
            Command::List(args) => commands::list(args, &session),
            Command::Show(args) => commands::show(args, &session),
            Command::Versions(args) => commands::versions(args, &session),
            Command::Create(args) => commands::create(args, &session),
            Command::Activate(args) => commands::activate(args, &session),
            Command::Delete(args) => commands::delete(args, &session),
            Command::Diff(args) => commands::diff(args, &session),
            Command::Apply(args) => commands::apply(args, &session),
            Command::Vars(args) => commands::vars(args, &session),
            Command::Backup => commands::backup(&session),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
