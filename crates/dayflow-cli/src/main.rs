use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "dayflow", version, about = "Dayflow day planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timeline synthesis
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Day initialization
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Rota calendar and overrides
    Rota {
        #[command(subcommand)]
        action: commands::rota::RotaAction,
    },
    /// Planner settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Watch the timeline and print start notifications
    Watch(commands::watch::WatchArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Rota { action } => commands::rota::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dayflow", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
