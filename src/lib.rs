//! Artist export CLI library
//!
//! This library resolves a list of artist names against the Spotify catalog,
//! enriches each artist with its top tracks and their audio features, and
//! exports the result as CSV. The same pipeline is reachable from the command
//! line and from a small HTTP front end.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the upload server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Accumulation and CSV export of artist records
//! - `pipeline` - The per-artist enrichment pipeline and its run state
//! - `server` - HTTP server wiring for the API endpoints
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Input parsing and terminal helpers
//!
//! # Example
//!
//! ```ignore
//! use artistscope::{config::Config, pipeline::Pipeline, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> artistscope::Res<()> {
//!     let client = SpotifyClient::new(Config::from_env()?)?;
//!     let records = Pipeline::new(client).run(&["Daft Punk".to_string()]).await?;
//!     println!("{} artists", records.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used for top-level plumbing where the concrete error type does not
/// matter to the caller. Keeps Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// ```ignore
/// info!("Processing {} artists...", count);
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
/// ```ignore
/// success!("CSV exported to {}", path.display());
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
/// Terminates the process with exit code 1 right after printing. Only the
/// binary uses it; library code reports failures through return values or
/// [`warning!`].
///
/// ```ignore
/// error!("Failed to obtain access token. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for every failure the pipeline absorbs: skipped artists, empty track
/// listings, and track fields that fell back to their defaults.
///
/// ```ignore
/// warning!("Artist '{}' not found, skipping.", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
