//! # API Module
//!
//! HTTP endpoints for the short-lived local server used during interactive
//! authorization:
//!
//! - [`callback`] - receives the redirect from Spotify's authorization
//!   server, verifies the `state` parameter and exchanges the authorization
//!   code for a token.
//! - [`health`] - a health check endpoint returning status and version.
//!
//! The server only runs for the duration of `chronicli auth`; the scheduled
//! sync never binds a port.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
