//! Chronicle Sync CLI Library
//!
//! This library files a Spotify user's liked tracks into monthly "Chronicle"
//! playlists. Each liked track lands in the playlist named after the UTC
//! calendar month it was liked in (e.g. `January 2024 - Chronicle`), with no
//! duplicate entries regardless of how often the sync runs.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading and the explicit credential structs
//! - `error` - The error taxonomy shared across the sync core
//! - `management` - Access token lifecycle and caching
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - The remote library capability and its Spotify Web API client
//! - `sync` - The incremental synchronization core
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use chronicli::{config, spotify::SpotifyLibrary, sync};
//!
//! #[tokio::main]
//! async fn main() -> chronicli::Res<()> {
//!     config::load_env().await?;
//!     let cfg = config::Config::from_env()?;
//!     let api = SpotifyLibrary::new(&cfg);
//!     let window = sync::window::resolve_window(cfg.last_run.as_deref(), chrono::Utc::now());
//!     let report = sync::run(&api, window.start, sync::SyncMode::Incremental).await?;
//!     println!("{} track(s) added", report.total_added());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the program with exit code 1 after printing. It
/// should only be used at the CLI layer for unrecoverable errors; library
/// code propagates [`error::SyncError`] instead.
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
/// Used for recoverable issues or important information that users should
/// notice, such as falling back to the default look-back window.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
