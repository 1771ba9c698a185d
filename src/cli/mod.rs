//! # CLI Module
//!
//! User-facing command implementations. Each command builds its own
//! [`crate::config::Config`] from the environment, drives the library
//! components and reports through the crate's logging macros.
//!
//! ## Commands
//!
//! - [`collect`] - reads artist names from a CSV file, runs the enrichment
//!   pipeline and exports the result as CSV
//! - [`serve`] - starts the HTTP front end that runs the same pipeline for
//!   uploaded CSV files
//!
//! ## Exit Behavior
//!
//! Configuration errors, unreadable input, authentication failures and
//! export I/O errors terminate the process with exit code 1. A run in which
//! no artist resolved is not an error: it prints a warning and writes no file.
//!
//! ## Usage
//!
//! ```bash
//! artistscope collect --input bandname.csv --output artist_top_tracks.csv
//! artistscope serve --address 127.0.0.1:5000
//! ```

mod collect;
mod serve;

pub use collect::collect;
pub use serve::serve;
