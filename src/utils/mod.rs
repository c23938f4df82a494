//! Helpers shared by the HTTP and service layers.
//!
//! - [`url_validation`] - target URL validation
//! - [`client_ip`] - visitor address extraction

pub mod client_ip;
pub mod url_validation;
