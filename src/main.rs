//! ScopeGen - radar-scope profile generator
//!
//! Reads exported facility configuration and writes ready-to-use radar-scope
//! display profiles, one per facility or area.

use clap::{Parser, Subcommand};
use scopegen::cli::{
    AirportArgs, ApplyArgs, CliResult, ConfigArgs, GenerateArgs, InspectArgs, MergeMapsArgs,
    ProfilesArgs, ScanArgs, StationArgs,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ScopeGen - generate radar-scope profiles from facility configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List facilities, areas and maps in source documents
    Scan(ScanArgs),
    /// Generate a profile for a facility or area
    Generate(GenerateArgs),
    /// Apply display settings to an existing profile
    Apply(ApplyArgs),
    /// Summarize an existing profile
    Inspect(InspectArgs),
    /// List profiles grouped by region and facility
    Profiles(ProfilesArgs),
    /// Find the weather radar station for a location
    Station(StationArgs),
    /// Resolve local airport codes to ICAO codes
    Airport(AirportArgs),
    /// Merge GeoJSON map layers into one file
    MergeMaps(MergeMapsArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

impl Commands {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Scan(args) => args.execute(),
            Self::Generate(args) => args.execute(),
            Self::Apply(args) => args.execute(),
            Self::Inspect(args) => args.execute(),
            Self::Profiles(args) => args.execute(),
            Self::Station(args) => args.execute(),
            Self::Airport(args) => args.execute(),
            Self::MergeMaps(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = cli.command.execute() {
        eprintln!("Error: {err}");
        std::process::exit(err.kind.code());
    }
}
