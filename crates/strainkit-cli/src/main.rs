//! Strainkit CLI - command-line tools for gravitational-wave strain data.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strainkit")]
#[command(author, version, about = "Gravitational-wave strain tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show strain file metadata and statistics
    Info(commands::info::InfoArgs),

    /// Estimate the noise power spectral density
    Psd(commands::psd::PsdArgs),

    /// Whiten strain against its own PSD estimate
    Whiten(commands::whiten::WhitenArgs),

    /// Shift strain up in frequency and render it as audio
    Shift(commands::shift::ShiftArgs),

    /// Render strain as a WAV file
    Audio(commands::audio::AudioArgs),

    /// Build figure descriptions from matched-filter results
    Plots(commands::plots::PlotsArgs),

    /// Run whitening and audio rendering for every detector of an event
    Event(commands::event::EventArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Psd(args) => commands::psd::run(args),
        Commands::Whiten(args) => commands::whiten::run(args),
        Commands::Shift(args) => commands::shift::run(args),
        Commands::Audio(args) => commands::audio::run(args),
        Commands::Plots(args) => commands::plots::run(args),
        Commands::Event(args) => commands::event::run(args),
    }
}
