pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "ronja",
    about = "Ronja CRM operator CLI",
    long_about = "Apply migrations, inspect configuration, check readiness and fetch metal exchange rates.",
    after_help = "Examples:\n  ronja migrate\n  ronja doctor --json\n  ronja rates"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity and exchange key readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Fetch the latest metal exchange rates once and print them as JSON")]
    Rates,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Rates => commands::rates::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
