//! # CLI Module
//!
//! The user-facing command implementations:
//!
//! - [`auth`] - interactive Spotify authorization; produces the refresh
//!   token the scheduled runs depend on
//! - [`sync`] - incremental run from the externally supplied high-water
//!   mark (`LAST_RUN_TIMESTAMP`)
//! - [`backlog`] - one-time historical backfill from an explicit start date
//!
//! Each command loads its configuration, delegates to the sync core, and
//! renders the per-month outcome table. All output is human-readable
//! progress/summary lines; there is no machine-readable format.

mod auth;
mod backlog;
mod sync;

pub use auth::auth;
pub use backlog::backlog;
pub use sync::sync;

use tabled::Table;

use crate::{info, success, sync::SyncReport, types::MonthTableRow, warning};

/// Renders the per-month summary table and returns whether any month
/// failed.
pub(crate) fn print_report(report: &SyncReport) -> bool {
    if report.months.is_empty() {
        info!("No new liked tracks found.");
        return false;
    }

    let rows: Vec<MonthTableRow> = report
        .months
        .iter()
        .map(|m| MonthTableRow {
            month: m.key.to_string(),
            playlist: m.playlist_name.clone(),
            added: m.added.to_string(),
            status: match &m.error {
                None if m.playlist_created => "ok (created)".to_string(),
                None => "ok".to_string(),
                Some(e) => format!("failed: {}", e),
            },
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);

    if report.has_errors() {
        warning!(
            "Completed with per-month errors; a re-invocation will safely pick up the failed month(s)."
        );
        true
    } else {
        success!("{} track(s) added in total.", report.total_added());
        false
    }
}
