//! Record store implementations.
//!
//! # Stores
//!
//! - [`PgShortUrlRepository`] - short URL records in PostgreSQL
//! - [`PgAccessLogRepository`] - access log entries in PostgreSQL
//! - [`MemoryStore`] - both contracts in process memory

pub mod memory_store;
pub mod pg_access_log_repository;
pub mod pg_short_url_repository;

pub use memory_store::MemoryStore;
pub use pg_access_log_repository::PgAccessLogRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
