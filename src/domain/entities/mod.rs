//! Core domain entities.
//!
//! - [`ShortUrl`] - a stored long URL addressed by its id-derived code
//! - [`AccessLog`] - one recorded redirect
//!
//! Creation inputs are separate types (`NewShortUrl`, `NewAccessLog`) so that
//! server-controlled columns cannot be supplied by callers.

pub mod access_log;
pub mod short_url;

pub use access_log::{AccessLog, MAX_REFERER_LEN, MAX_USER_AGENT_LEN, NewAccessLog};
pub use short_url::{NewShortUrl, ShortUrl, ShortUrlPatch};
