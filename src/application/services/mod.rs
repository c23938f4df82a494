//! Business logic services for the application layer.

pub mod resolver;
pub mod short_url_service;

pub use resolver::{NotFoundReason, Resolution, Resolver};
pub use short_url_service::ShortUrlService;
