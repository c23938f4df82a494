//! Record Store contracts.
//!
//! The traits here are the only way the application layer touches storage.
//! Implementations live in [`crate::infrastructure::persistence`]; mocks are
//! generated with `mockall` for unit tests.

pub mod access_log_repository;
pub mod short_url_repository;

pub use access_log_repository::AccessLogRepository;
pub use short_url_repository::ShortUrlRepository;

#[cfg(test)]
pub use access_log_repository::MockAccessLogRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
