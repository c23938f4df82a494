//! Target URL validation.
//!
//! Short URLs may only point at absolute network URLs. The accepted value is
//! stored exactly as sent, minus surrounding whitespace: `Location` must echo
//! what the creator submitted.

use url::Url;

/// Longest stored target URL, in characters.
pub const MAX_URL_LEN: usize = 2048;

/// Errors produced while validating a target URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only http, https, ftp and ftps URLs are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL is longer than {MAX_URL_LEN} characters")]
    TooLong,
}

/// Validates `input` and returns the string to store.
///
/// # Rules
///
/// 1. **Protocol**: `http`, `https`, `ftp` and `ftps` only
/// 2. **Hostname**: required
/// 3. **Length**: at most [`MAX_URL_LEN`] characters
///
/// Parsing is only used for checking; the returned value is the trimmed
/// input, never the parser's serialization.
///
/// # Examples
///
/// ```
/// use shorturl::utils::url_validation::validate_target_url;
///
/// assert_eq!(
///     validate_target_url(" https://Example.com ").unwrap(),
///     "https://Example.com"
/// );
/// ```
pub fn validate_target_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.chars().count() > MAX_URL_LEN {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" | "ftp" | "ftps" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}
