//! CLI command handlers for ScopeGen.
//!
//! Every subcommand is scriptable: human-readable output by default, JSON
//! with `--json`, and a distinct exit code per failure class.

pub mod airport;
pub mod apply;
pub mod common;
pub mod config;
pub mod generate;
pub mod inspect;
pub mod merge;
pub mod profiles;
pub mod scan;
pub mod station;

// Re-export types used by main.rs and tests
pub use airport::AirportArgs;
pub use apply::ApplyArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use generate::GenerateArgs;
pub use inspect::InspectArgs;
pub use merge::MergeMapsArgs;
pub use profiles::ProfilesArgs;
pub use scan::ScanArgs;
pub use station::StationArgs;
