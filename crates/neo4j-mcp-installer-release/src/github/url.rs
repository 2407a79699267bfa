//! URL construction helpers for GitHub resources

use thiserror::Error;
use url::Url;

/// Appends path segments to `base`, keeping any path it already has.
///
/// Each segment is percent-encoded, so a tag can never introduce extra
/// path components.
///
/// # Errors
///
/// Returns error if URL cannot be a base
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, UrlError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: base.clone() })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Parses a configured base URL
pub fn parse_base(url: &str) -> Result<Url, UrlError> {
    Ok(Url::parse(url)?)
}

/// URL construction errors
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL cannot be used as a base
    #[error("URL cannot be a base: {url}")]
    CannotBeABase {
        /// The problematic URL
        url: Url,
    },

    /// Invalid URL parse error
    #[error("Invalid URL: {0}")]
    ParseError(#[from] url::ParseError),
}
