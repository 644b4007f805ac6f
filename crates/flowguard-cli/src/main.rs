use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "flowguard-cli", version, about = "FlowGuard project health CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project snapshot
    Analyze(commands::analyze::AnalyzeArgs),
    /// Print the bundled sample project as JSON
    Sample,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Sample => commands::sample::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
