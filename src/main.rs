//! FitLog CLI entry point.

use clap::Parser;
use fitlog::cli::commands;
use fitlog::cli::{Cli, Commands};
use fitlog::error::Error;
use std::io::IsTerminal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose, cli.quiet);

    // Piped stdout gets JSON
    let json = cli.json || !std::io::stdout().is_terminal();

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();
    match &cli.command {
        Commands::Init => commands::init::execute(db, json),
        Commands::Version => commands::version::execute(json),
        Commands::Status => commands::status::execute(db, json),

        Commands::Profile { command } => commands::profile::execute(command, db, json),
        Commands::Exercise { command } => commands::exercise::execute(command, db, json),
        Commands::Food { command } => commands::food::execute(command, db, json),
        Commands::Weight { command } => commands::weight::execute(command, db, json),
        Commands::Workout { command } => commands::workout::execute(command, db, json),

        Commands::Backup { command } => {
            commands::backup::execute(command, db, cli.staging.as_ref(), json)
        }
        Commands::Reset { yes } => commands::reset::execute(*yes, db, json),
        Commands::Completions { shell } => commands::completions::execute(*shell),
    }
}
