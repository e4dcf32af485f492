use crate::{
    cli::print_report,
    config::Config,
    error, info,
    spotify::SpotifyLibrary,
    sync::{self, SyncMode, window},
};

/// One-time historical backfill: process every like from `since`
/// (YYYY-MM-DD, UTC midnight, inclusive) forward, one monthly playlist per
/// month touched.
pub async fn backlog(cfg: Config, since: Option<String>) {
    let start = match since {
        Some(raw) => match window::parse_backlog_date(&raw) {
            Ok(parsed) => parsed,
            Err(e) => error!("{}", e),
        },
        None => window::backlog_epoch(),
    };

    info!("Fetching liked tracks since: {}", start.to_rfc3339());

    let api = SpotifyLibrary::with_cached_token(&cfg).await;

    match sync::run(&api, start, SyncMode::Backlog).await {
        Ok(report) => {
            if print_report(&report) {
                std::process::exit(1);
            }
        }
        Err(e) => error!("Backlog failed: {}", e),
    }
}
