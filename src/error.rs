//! Error taxonomy for the sync core.
//!
//! Every remote interaction surfaces as a [`SyncError`], classified so the
//! orchestrator can tell which failures poison the whole invocation and
//! which are scoped to a single month:
//!
//! - `Config` and `InvalidDate` abort before any remote call is made.
//! - `Auth` aborts all remaining processing; no further remote call can
//!   succeed until the user re-authorizes.
//! - `Api` is transient; it fails the operation in progress but sibling
//!   months still complete, and a later re-invocation is safe because the
//!   core re-checks remote state before mutating it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A required credential or setting is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote service rejected our credentials (401/403). Not
    /// retryable without re-authorization.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transient network or API failure. Safe to recover by re-invoking
    /// the whole run.
    #[error("spotify api error: {0}")]
    Api(String),

    /// An unparseable date was supplied for the backfill start.
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// A batched append failed after some batches were already committed
    /// remotely. There is no rollback; `appended` tracks are in the
    /// playlist and a retry will skip them via the membership re-check.
    #[error("append failed after {appended} track(s) were committed: {source}")]
    PartialAppend {
        appended: usize,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// Whether this failure means the whole invocation must stop because
    /// no further remote call can succeed.
    pub fn is_auth(&self) -> bool {
        match self {
            SyncError::Auth(_) => true,
            SyncError::PartialAppend { source, .. } => source.is_auth(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        use reqwest::StatusCode;
        if let Some(status) = err.status() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return SyncError::Auth(err.to_string());
            }
        }
        SyncError::Api(err.to_string())
    }
}
