//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Server used when neither `--server` nor `--db` is given
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(name = "mctoy")]
#[command(about = "Track which McDonald's has which Happy Meal toy")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Locations server to talk to
    #[arg(long, value_name = "URL", conflicts_with = "db")]
    pub server: Option<String>,

    /// Use a local database file instead of a server
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Toy catalog (`.json` or `.ron`)
    #[arg(long, value_name = "PATH", default_value = "data/toys.json")]
    pub catalog: PathBuf,

    /// Discovery radius in meters
    #[arg(long, default_value_t = mctoy_core::DEFAULT_RADIUS_METERS)]
    pub radius: u32,

    /// Overpass interpreter endpoint
    #[arg(long, value_name = "URL", default_value = mctoy_net::DEFAULT_OVERPASS_URL)]
    pub overpass_url: String,

    /// Nominatim base URL
    #[arg(long, value_name = "URL", default_value = mctoy_net::DEFAULT_NOMINATIM_URL)]
    pub nominatim_url: String,

    /// Timeout for each outbound request, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List known locations
    List {
        /// Only locations that have this toy
        #[arg(long)]
        toy: Option<String>,
    },
    /// Find locations near an address and save them
    Search {
        /// Free-form address
        address: String,
    },
    /// Replace the toys of a location
    SetToys {
        /// Location id
        place_id: String,
        /// Toy names; none clears the list
        toys: Vec<String>,
    },
    /// List the toy catalog
    Toys,
}

impl Cli {
    /// Per-request timeout, if one was given
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Server URL, falling back to [`DEFAULT_SERVER`]
    pub fn server_url(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}
