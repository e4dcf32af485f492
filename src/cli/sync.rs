use chrono::Utc;

use crate::{
    cli::print_report,
    config::Config,
    error, info,
    spotify::SpotifyLibrary,
    sync::{self, SyncMode, window},
    warning,
};

/// Incremental run: resolve the window from the externally supplied
/// high-water mark and bring the affected months up to date.
pub async fn sync(cfg: Config) {
    let window = window::resolve_window(cfg.last_run.as_deref(), Utc::now());
    match window.source {
        window::WindowSource::MissingFallback => {
            warning!(
                "LAST_RUN_TIMESTAMP not set; falling back to the last {} hours.",
                window::DEFAULT_LOOKBACK_HOURS
            );
        }
        window::WindowSource::MalformedFallback => {
            warning!(
                "LAST_RUN_TIMESTAMP is not a valid RFC 3339 timestamp; falling back to the last {} hours.",
                window::DEFAULT_LOOKBACK_HOURS
            );
        }
        window::WindowSource::LastRun | window::WindowSource::MarginClamp => {}
    }
    info!("Fetching liked tracks since: {}", window.start.to_rfc3339());

    let api = SpotifyLibrary::with_cached_token(&cfg).await;

    match sync::run(&api, window.start, SyncMode::Incremental).await {
        Ok(report) => {
            if print_report(&report) {
                std::process::exit(1);
            }
        }
        Err(e) => error!("Sync failed: {}", e),
    }
}
