//! projdyn CLI: headless Projective Dynamics scenarios.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "projdyn")]
#[command(version, about = "Projective Dynamics for deformable solids and cloth")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a scenario file.
    Simulate {
        /// Path to scenario config (TOML).
        #[arg(short, long, default_value = "scenario.toml")]
        config: String,

        /// Write every frame's positions to this JSON file.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a scenario file.
    Validate {
        /// Path to scenario config (TOML).
        path: String,
    },

    /// Run the built-in hanging-cloth scenario.
    Demo {
        /// Write every frame's positions to this JSON file.
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate { config, output } => commands::simulate(&config, output.as_deref()),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Demo { output } => commands::demo(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
