//! Domain layer: entities, the id codec, eligibility and the access log pipeline.
//!
//! Nothing in here depends on HTTP or on a particular storage engine.
//!
//! # Modules
//!
//! - [`codec`] - reversible base-62 mapping between ids and short codes
//! - [`eligibility`] - the single "live record" predicate
//! - [`entities`] - stored data structures
//! - [`repositories`] - Record Store traits
//! - [`access_event`] - request metadata captured on redirect
//! - [`access_log_sink`] - non-blocking enqueue handle
//! - [`access_log_worker`] - background persistence of access events
//!
//! # Access Logging Flow
//!
//! 1. The resolver finds an eligible record and increments its counter
//! 2. An [`access_event::AccessEvent`] is handed to [`access_log_sink::AccessLogSink`]
//! 3. [`access_log_worker::run_access_log_worker`] persists it with retries
//! 4. Failures are reported through tracing and metrics only

pub mod access_event;
pub mod access_log_sink;
pub mod access_log_worker;
pub mod codec;
pub mod eligibility;
pub mod entities;
pub mod repositories;
