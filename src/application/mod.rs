//! Application layer services implementing business logic.
//!
//! Services consume the repository traits and give HTTP handlers and the
//! admin CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::resolver::Resolver`] - short code to redirect target
//! - [`services::short_url_service::ShortUrlService`] - record lifecycle and access log queries

pub mod services;
