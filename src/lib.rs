//! Spotify Playlist Analyzer Library
//!
//! This library fetches a playlist's items and the metadata of the artists it
//! references from the Spotify Web API, then ranks the playlist's top
//! contributors, artists and genres. The same pipeline backs the HTTP API
//! (`plstats serve`) and the command line (`plstats analyze`).
//!
//! # Modules
//!
//! - `analysis` - The aggregation pipeline: fetch, enrich, rank, resolve
//! - `api` - HTTP endpoints
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and its JSON rendering
//! - `management` - Credential providers and token caches
//! - `server` - Router construction and HTTP servers
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use plstats::{analysis, spotify::SpotifyClient, types::Credential};
//!
//! #[tokio::main]
//! async fn main() -> plstats::Res<()> {
//!     let client = SpotifyClient::from_env()?;
//!     let credential = Credential::new("BQC...");
//!     let result = analysis::analyze(&client, "37i9dQZF1DXcBWIGoYBM5M", &credential).await?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

use tracing_subscriber::EnvFilter;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the command line layer
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use plstats::Res;
///
/// async fn analyze_playlist() -> Res<()> {
///     let _client = plstats::spotify::SpotifyClient::from_env()?;
///     Ok(())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling it twice is
/// harmless; the second call is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Prints an informational message with a blue bullet point.
///
/// Used for progress and status updates on the command line. Operator-facing
/// diagnostics go through `tracing` instead.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Fetching playlist {}...", playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to confirm that a command finished, such as a completed login.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// success!("Token saved to {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output on stderr and immediately terminates the
/// program with exit code 1. Used for unrecoverable errors in the command
/// line layer; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// warning!("Could not open a browser, visit {} manually", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
